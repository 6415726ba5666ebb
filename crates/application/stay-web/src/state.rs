//! Application state: configuration, the predictor and per-browser sessions

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use stay_config::StayConfig;
use stay_handoff::{HandoffStore, MemoryHandoff};
use stay_map::{LeafletCanvas, LeafletLibrary, MapAdapter, MapSettings};
use stay_predict::{LoadingTiming, MockPredictor, Predictor, ResultViewer};
use stay_wizard::IntakeWizard;
use tokio::sync::{Mutex, RwLock};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "stay_session";

/// Sessions untouched for this long are dropped when a new one is created.
const SESSION_IDLE_HOURS: i64 = 2;

/// One browser session
pub struct Session {
    pub wizard: IntakeWizard,
    /// Browser-session scoped handoff slot
    pub handoff: MemoryHandoff,
    /// The result page currently open, if any
    pub viewer: Option<ResultViewer>,
    pub map: MapAdapter,
    pub canvas: LeafletCanvas,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(config: &StayConfig) -> Self {
        let canvas = LeafletCanvas::new();
        let map = MapAdapter::new(
            Arc::new(LeafletLibrary::new(canvas.clone())),
            MapSettings::from_config(&config.map),
        );
        Self {
            wizard: IntakeWizard::starting_at(config.location.fallback()),
            handoff: MemoryHandoff::new(),
            viewer: None,
            map,
            canvas,
            last_seen: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    fn is_idle(&self, now: DateTime<Utc>) -> bool {
        now - self.last_seen > Duration::hours(SESSION_IDLE_HOURS)
    }
}

/// Shared application state
pub struct AppState {
    pub config: StayConfig,
    pub predictor: Arc<dyn Predictor>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State backed by the randomized predictor
    pub fn new(config: StayConfig) -> Self {
        Self::with_predictor(config, Arc::new(MockPredictor::new()))
    }

    pub fn with_predictor(config: StayConfig, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            config,
            predictor,
            sessions: RwLock::new(HashMap::new()),
            started_at: Utc::now(),
        }
    }

    pub fn timing(&self) -> LoadingTiming {
        LoadingTiming::from_config(&self.config.loading)
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Session for the request's cookie, creating one (and the cookie) if
    /// the browser has none or an unknown one.
    pub async fn session(&self, cookies: &Cookies) -> Arc<Mutex<Session>> {
        if let Some(id) = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
            let existing = self.sessions.read().await.get(&id).cloned();
            if let Some(session) = existing {
                session.lock().await.touch();
                return session;
            }
        }

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new(&self.config)));
        {
            let mut sessions = self.sessions.write().await;
            prune_idle(&mut sessions);
            sessions.insert(id.clone(), session.clone());
            info!(sessions = sessions.len(), "session created");
        }

        let mut cookie = Cookie::new(SESSION_COOKIE, id);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookies.add(cookie);

        session
    }
}

/// Drop idle sessions, emptying their handoff slots. Sessions busy with a
/// request are kept.
fn prune_idle(sessions: &mut HashMap<String, Arc<Mutex<Session>>>) {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, session| match session.try_lock() {
        Ok(session) if session.is_idle(now) => {
            if let Err(e) = session.handoff.clear() {
                warn!(error = %e, "failed to clear handoff slot of idle session");
            }
            false
        }
        Ok(_) => true,
        Err(_) => true,
    });
    let pruned = before - sessions.len();
    if pruned > 0 {
        debug!(pruned, "idle sessions dropped");
    }
}
