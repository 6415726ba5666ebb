//! # Stay Handoff
//!
//! A single named slot carrying the submitted [`PropertyDraft`] across the
//! navigation from the intake wizard to the result viewer.
//!
//! The slot is a last-writer-wins register: the wizard writes once on
//! submission, the viewer reads once when it opens. The store is injected
//! into both sides so tests never need a browser or a real disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use stay_core::PropertyDraft;

/// Name of the slot
pub const HANDOFF_KEY: &str = "propertyData";

/// Result type for stay-handoff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur reading or writing the slot
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Single-slot draft store
pub trait HandoffStore: Send + Sync {
    /// Replace the slot contents with `draft`.
    fn write(&self, draft: &PropertyDraft) -> Result<()>;

    /// Current contents, `None` when nothing was handed off.
    fn read(&self) -> Result<Option<PropertyDraft>>;

    /// Empty the slot.
    fn clear(&self) -> Result<()>;
}

/// What actually lands in the slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    key: String,
    written_at: chrono::DateTime<chrono::Utc>,
    draft: PropertyDraft,
}

impl Envelope {
    fn wrap(draft: &PropertyDraft) -> Self {
        Self {
            key: HANDOFF_KEY.to_string(),
            written_at: chrono::Utc::now(),
            draft: draft.clone(),
        }
    }
}

/// Process-local slot holding the serialized draft text
#[derive(Debug, Clone, Default)]
pub struct MemoryHandoff {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot text, as another reader would see it.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrite the slot with arbitrary text.
    pub fn put_raw(&self, text: impl Into<String>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }
}

impl HandoffStore for MemoryHandoff {
    fn write(&self, draft: &PropertyDraft) -> Result<()> {
        let text = serde_json::to_string(&Envelope::wrap(draft))?;
        self.put_raw(text);
        tracing::debug!(key = HANDOFF_KEY, "draft written to memory slot");
        Ok(())
    }

    fn read(&self) -> Result<Option<PropertyDraft>> {
        match self.raw() {
            Some(text) => {
                let envelope: Envelope = serde_json::from_str(&text)?;
                Ok(Some(envelope.draft))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Slot persisted as a JSON file so it survives a process hop
#[derive(Debug, Clone)]
pub struct FileHandoff {
    path: PathBuf,
}

impl FileHandoff {
    /// Slot at `<data_local_dir>/stay/propertyData.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stay");
        Self::in_dir(dir)
    }

    /// Slot named after [`HANDOFF_KEY`] inside `dir`, creating the directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self::at_path(dir.join(format!("{HANDOFF_KEY}.json"))))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HandoffStore for FileHandoff {
    fn write(&self, draft: &PropertyDraft) -> Result<()> {
        let content = serde_json::to_string_pretty(&Envelope::wrap(draft))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Temp file then rename so a reader never sees half a draft
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "draft written to file slot");
        Ok(())
    }

    fn read(&self) -> Result<Option<PropertyDraft>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let envelope: Envelope = serde_json::from_str(&content)?;
        Ok(Some(envelope.draft))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
