//! Stay Web
//!
//! Three screens rendered on the server and driven by HTMX:
//!
//! - **Landing**: what the service does and a link into the wizard
//! - **Wizard**: the three intake steps, one session-scoped draft
//! - **Results**: staged loading, then prediction, factors, map and comparables
//!
//! Every browser session gets its own wizard, handoff slot, result viewer
//! and map, keyed by the `stay_session` cookie.

pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

pub use state::{AppState, Session, SESSION_COOKIE};

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/predict", get(handlers::predict_page))
        .route("/results", get(handlers::results_page))
        // Wizard actions
        .route("/predict/type", post(handlers::set_type))
        .route("/predict/address", post(handlers::set_address))
        .route("/predict/suggestion", post(handlers::select_suggestion))
        .route("/predict/capacity", post(handlers::set_capacity))
        .route("/predict/amenity", post(handlers::toggle_amenity))
        .route("/predict/next", post(handlers::next_step))
        .route("/predict/back", post(handlers::previous_step))
        .route("/predict/submit", post(handlers::submit))
        // HTMX partials
        .route("/htmx/suggestions", get(handlers::suggestions))
        .route("/htmx/results", get(handlers::results_panel))
        .route("/results/report", post(handlers::download_report))
        // API
        .route("/api/health", get(handlers::health))
        .route("/api/results", get(handlers::api_results))
        // Static
        .route("/static/style.css", get(handlers::style_css))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "stay web listening");

    axum::serve(listener, app).await
}
