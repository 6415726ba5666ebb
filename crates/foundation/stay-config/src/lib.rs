//! Configuration for the stay price estimator
//!
//! Resolution order: explicit path, `STAY_CONFIG`, `<config_dir>/stay/config.yaml`,
//! then built-in defaults. Every field is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stay_core::LatLng;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "STAY_CONFIG";

/// Result type for stay-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StayConfig {
    pub server: ServerConfig,
    pub loading: LoadingConfig,
    pub map: MapConfig,
    pub location: LocationConfig,
    pub handoff: HandoffConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Cadence of the staged analysis display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub tick_ms: u64,
    pub total_ms: u64,
    pub progress_step: u8,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 800,
            total_ms: 4500,
            progress_step: 20,
        }
    }
}

impl LoadingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    /// Full width of the random offset window around the center, in degrees
    pub jitter_degrees: f64,
    pub primary_label: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 14,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            jitter_degrees: 0.01,
            primary_label: "<b>내 숙소</b><br>예측 위치".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: stay_core::FALLBACK_LOCATION.lat,
            longitude: stay_core::FALLBACK_LOCATION.lng,
        }
    }
}

impl LocationConfig {
    pub fn fallback(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    /// File-backed slot location; in-memory when unset
    pub path: Option<PathBuf>,
}

impl StayConfig {
    /// Load using the standard resolution order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: StayConfig = if content.trim().is_empty() {
            StayConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let loading = &self.loading;
        if loading.tick_ms == 0 {
            return Err(Error::Invalid("loading.tick_ms must be positive".into()));
        }
        if loading.total_ms < loading.tick_ms {
            return Err(Error::Invalid(
                "loading.total_ms must be at least loading.tick_ms".into(),
            ));
        }
        if !(1..=100).contains(&loading.progress_step) {
            return Err(Error::Invalid(
                "loading.progress_step must be within 1..=100".into(),
            ));
        }
        if !(1..=20).contains(&self.map.zoom) {
            return Err(Error::Invalid("map.zoom must be within 1..=20".into()));
        }
        if self.map.jitter_degrees.is_nan() || self.map.jitter_degrees < 0.0 {
            return Err(Error::Invalid("map.jitter_degrees must not be negative".into()));
        }
        Ok(())
    }
}

/// `<config_dir>/stay/config.yaml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stay").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = StayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.loading.tick(), Duration::from_millis(800));
        assert_eq!(config.location.fallback(), stay_core::FALLBACK_LOCATION);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = StayConfig::from_yaml("server:\n  port: 8080\nmap:\n  zoom: 12\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.loading.total_ms, 4500);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(StayConfig::from_yaml("").unwrap(), StayConfig::default());
    }

    #[test]
    fn test_rejects_bad_timing() {
        let err = StayConfig::from_yaml("loading:\n  tick_ms: 1000\n  total_ms: 500\n");
        assert!(matches!(err, Err(Error::Invalid(_))));

        let err = StayConfig::from_yaml("loading:\n  progress_step: 0\n");
        assert!(matches!(err, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "handoff:\n  path: /tmp/stay-handoff.json").unwrap();

        let config = StayConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.handoff.path, Some(PathBuf::from("/tmp/stay-handoff.json")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = StayConfig::from_path(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(err, Err(Error::Io { .. })));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = StayConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(StayConfig::from_yaml(&yaml).unwrap(), config);
    }
}
