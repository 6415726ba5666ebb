//! Route handlers

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use stay_core::{Amenity, PropertyType};
use stay_map::MapView;
use stay_predict::{ResultViewer, ViewerPhase};
use stay_wizard::{IntakeWizard, WizardError};
use tower_cookies::Cookies;
use tracing::{debug, info, warn};

use crate::state::{AppState, Session};
use crate::templates;

/// Request came from HTMX rather than a plain navigation
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

fn wizard_panel(wizard: &IntakeWizard, notice: Option<&str>) -> Html<String> {
    Html(templates::wizard_html(wizard, notice))
}

/// Rejections keep the wizard where it is and explain why in the panel.
fn rejection_notice(error: &WizardError) -> String {
    match error {
        WizardError::Incomplete { step } => step.hint().to_string(),
        WizardError::AtLastStep => "마지막 단계입니다".to_string(),
        WizardError::AtFirstStep => "첫 단계입니다".to_string(),
        WizardError::NotTerminal { .. } => "모든 단계를 먼저 완료해주세요".to_string(),
        WizardError::Invalid(e) => e.to_string(),
        WizardError::Handoff(_) => "입력 정보를 저장하지 못했습니다. 다시 시도해주세요".to_string(),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

// ============== Pages ==============

pub async fn index() -> impl IntoResponse {
    Html(templates::landing_html())
}

pub async fn predict_page(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let session = session.lock().await;
    Html(templates::predict_page_html(&session.wizard))
}

/// Each visit is a fresh page load: a new viewer replaces (and cancels)
/// the previous one, and any map from the previous load goes away.
pub async fn results_page(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;

    session.map.unmount();
    let viewer = ResultViewer::open(&session.handoff, state.predictor.clone(), state.timing());
    session.viewer = Some(viewer);

    let panel = render_results(&mut session).await;
    Html(templates::results_page_html(&panel))
}

// ============== Wizard actions ==============

#[derive(Deserialize)]
pub struct TypeInput {
    pub property_type: String,
}

pub async fn set_type(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<TypeInput>,
) -> Response {
    let kind = match PropertyType::from_str(&input.property_type) {
        Ok(kind) => kind,
        Err(e) => return bad_request(e.to_string()),
    };

    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    session.wizard.set_property_type(kind);
    wizard_panel(&session.wizard, None).into_response()
}

#[derive(Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub address: String,
}

/// Address keystrokes: updates the suggestion list, preview and buttons.
pub async fn set_address(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<AddressInput>,
) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    session.wizard.set_address(input.address);
    Html(templates::address_update_html(&session.wizard))
}

/// Address field gained focus
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(input): Query<AddressInput>,
) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    if session.wizard.draft().address != input.address {
        session.wizard.set_address(input.address);
    }
    session.wizard.focus_address();
    Html(templates::suggestions_html(&session.wizard.suggestions()))
}

pub async fn select_suggestion(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<AddressInput>,
) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    session.wizard.select_suggestion(&input.address);
    wizard_panel(&session.wizard, None)
}

#[derive(Deserialize)]
pub struct CapacityInput {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub guests: Option<u32>,
}

pub async fn set_capacity(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<CapacityInput>,
) -> Response {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    let wizard = &mut session.wizard;

    let result = match (input.bedrooms, input.bathrooms, input.guests) {
        (Some(n), None, None) => wizard.set_bedroom_count(n),
        (None, Some(n), None) => wizard.set_bathroom_count(n),
        (None, None, Some(n)) => wizard.set_max_guests(n),
        _ => return bad_request("exactly one of bedrooms, bathrooms, guests is required"),
    };

    match result {
        Ok(()) => wizard_panel(wizard, None).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct AmenityInput {
    pub amenity: String,
}

pub async fn toggle_amenity(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<AmenityInput>,
) -> Response {
    let amenity = match Amenity::from_str(&input.amenity) {
        Ok(amenity) => amenity,
        Err(e) => return bad_request(e.to_string()),
    };

    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    session.wizard.toggle_amenity(amenity);
    wizard_panel(&session.wizard, None).into_response()
}

pub async fn next_step(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    let notice = session.wizard.advance().err().map(|e| rejection_notice(&e));
    wizard_panel(&session.wizard, notice.as_deref())
}

pub async fn previous_step(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    let notice = session.wizard.retreat().err().map(|e| rejection_notice(&e));
    wizard_panel(&session.wizard, notice.as_deref())
}

/// Hand the draft off and move to the result page. A rejected submit
/// leaves the wizard as it was.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Response {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    let wizard = std::mem::take(&mut session.wizard);
    match wizard.submit(&session.handoff) {
        Ok(_) => {
            session.wizard = IntakeWizard::starting_at(state.config.location.fallback());
            if is_htmx(&headers) {
                let mut response = StatusCode::OK.into_response();
                response
                    .headers_mut()
                    .insert("HX-Redirect", HeaderValue::from_static("/results"));
                response
            } else {
                Redirect::to("/results").into_response()
            }
        }
        Err(rejected) => {
            let notice = rejection_notice(&rejected.error);
            session.wizard = *rejected.wizard;
            wizard_panel(&session.wizard, Some(&notice)).into_response()
        }
    }
}

// ============== Results ==============

/// Polled by the loading panel
pub async fn results_panel(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let mut session = session.lock().await;
    Html(render_results(&mut session).await)
}

/// Render the current phase. Once ready, the map is mounted for the
/// analysis and drawn by the page.
async fn render_results(session: &mut Session) -> String {
    let phase = session
        .viewer
        .as_ref()
        .map(ResultViewer::phase)
        .unwrap_or(ViewerPhase::Pending);

    let ViewerPhase::Ready(analysis) = &phase else {
        return templates::results_panel_html(&phase, None);
    };

    session.map.mount(MapView {
        container: templates::MAP_CONTAINER.to_string(),
        center: analysis.draft.location(),
        listings: analysis.comparables.clone(),
    });
    let status = session.map.wait_settled().await;
    debug!(?status, "result map settled");

    let script = session.canvas.script();
    templates::results_panel_html(&phase, script.as_deref())
}

pub async fn download_report(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    let session = state.session(&cookies).await;
    let session = session.lock().await;

    let phase = session
        .viewer
        .as_ref()
        .map(ResultViewer::phase)
        .unwrap_or(ViewerPhase::Pending);
    let Some(analysis) = phase.analysis() else {
        return (
            StatusCode::CONFLICT,
            Html(templates::report_notice_html("분석이 아직 완료되지 않았습니다")),
        )
            .into_response();
    };

    match stay_predict::download_report(analysis) {
        Ok(bytes) => {
            info!(bytes = bytes.len(), "report generated");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"report.pdf\""),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "report unavailable");
            let message = match e {
                stay_core::Error::NotImplemented(notice) => notice,
                other => other.to_string(),
            };
            Html(templates::report_notice_html(&message)).into_response()
        }
    }
}

// ============== API ==============

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "stay-web",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "sessions": state.session_count().await,
    }))
}

/// Current viewer phase as JSON
pub async fn api_results(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let session = state.session(&cookies).await;
    let session = session.lock().await;
    let phase = session
        .viewer
        .as_ref()
        .map(ResultViewer::phase)
        .unwrap_or(ViewerPhase::Pending);
    Json(phase)
}

// ============== Static ==============

pub async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::STYLE_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use stay_config::StayConfig;
    use stay_predict::MockPredictor;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::with_predictor(StayConfig::default(), Arc::new(MockPredictor::seeded(5)));
        create_router(Arc::new(state))
    }

    /// Percent-encode a form value
    fn encode(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, cookie: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    /// Open a session and return its cookie pair
    async fn open_session(app: &Router) -> String {
        let (_, headers, _) = send(app, get("/predict", "")).await;
        let set_cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn fill_and_submit(app: &Router, cookie: &str) -> HeaderMap {
        let address = format!("address={}", encode("서울특별시 강남구 테헤란로"));
        send(app, post("/predict/type", cookie, "property_type=apartment")).await;
        send(app, post("/predict/suggestion", cookie, &address)).await;
        send(app, post("/predict/next", cookie, "")).await;
        send(app, post("/predict/capacity", cookie, "bedrooms=2")).await;
        send(app, post("/predict/capacity", cookie, "bathrooms=1")).await;
        send(app, post("/predict/capacity", cookie, "guests=4")).await;
        send(app, post("/predict/next", cookie, "")).await;
        send(app, post("/predict/amenity", cookie, "amenity=wifi")).await;
        let (status, headers, _) = send(app, post("/predict/submit", cookie, "")).await;
        assert_eq!(status, StatusCode::OK);
        headers
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send(&app(), get("/api/health", "")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_landing_page() {
        let (status, _, body) = send(&app(), get("/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("핵심 기능"));
        assert!(body.contains(r#"href="/predict""#));
    }

    #[tokio::test]
    async fn test_predict_page_sets_session_cookie() {
        let app = app();
        let cookie = open_session(&app).await;
        assert!(cookie.starts_with("stay_session="));

        let (_, headers, body) = send(&app, get("/predict", &cookie)).await;
        assert!(headers.get(header::SET_COOKIE).is_none());
        assert!(body.contains("숙소 기본 정보"));
        assert!(body.contains("1 / 3 단계"));
    }

    #[tokio::test]
    async fn test_next_is_refused_without_basic_info() {
        let app = app();
        let cookie = open_session(&app).await;

        let (status, _, body) = send(&app, post("/predict/next", &cookie, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"class="notice""#));
        assert!(body.contains("1 / 3 단계"));
    }

    #[tokio::test]
    async fn test_address_edit_filters_suggestions() {
        let app = app();
        let cookie = open_session(&app).await;
        let form = format!("address={}", encode("강남"));

        let (_, _, body) = send(&app, post("/predict/address", &cookie, &form)).await;
        assert!(body.contains("서울특별시 강남구 테헤란로"));
        assert!(body.contains("서울특별시 서초구 강남역"));
        assert!(!body.contains("서울특별시 종로구 명동"));
        assert!(body.contains(r#"id="preview" class="card preview" hx-swap-oob="true""#));
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected() {
        let app = app();
        let cookie = open_session(&app).await;

        let (status, _, _) = send(&app, post("/predict/type", &cookie, "property_type=castle")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _, _) = send(&app, post("/predict/capacity", &cookie, "bedrooms=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _, _) = send(&app, post("/predict/amenity", &cookie, "amenity=sauna")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_results_without_handoff_stay_pending() {
        let app = app();
        let cookie = open_session(&app).await;

        let (status, _, body) = send(&app, get("/results", &cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("AI 가격 분석 중"));
        assert!(body.contains("0% 완료"));

        let (_, _, json) = send(&app, get("/api/results", &cookie)).await;
        assert_eq!(json, r#"{"phase":"pending"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_then_results_flow() {
        let app = app();
        let cookie = open_session(&app).await;

        let headers = fill_and_submit(&app, &cookie).await;
        assert_eq!(headers.get("HX-Redirect").unwrap(), "/results");

        let (_, _, body) = send(&app, get("/results", &cookie)).await;
        assert!(body.contains("숙소 정보 분석 중..."));
        assert!(body.contains(r#"hx-get="/htmx/results""#));

        tokio::time::sleep(Duration::from_millis(4600)).await;

        let (_, _, panel) = send(&app, get("/htmx/results", &cookie)).await;
        assert!(panel.contains("AI 가격 예측 결과"));
        assert!(panel.contains("강남역 도보 5분 모던 아파트"));
        assert!(panel.contains(r#"id="price-map""#));
        assert!(panel.contains("L.map(el)"));
        assert!(!panel.contains("hx-trigger"));

        let (_, _, body) = send(&app, post("/results/report", &cookie, "")).await;
        assert!(body.contains(stay_predict::REPORT_NOTICE));
    }

    #[tokio::test]
    async fn test_submit_resets_the_wizard() {
        let app = app();
        let cookie = open_session(&app).await;
        fill_and_submit(&app, &cookie).await;

        let (_, _, body) = send(&app, get("/predict", &cookie)).await;
        assert!(body.contains("1 / 3 단계"));
        assert!(body.contains("미선택"));
    }

    #[tokio::test]
    async fn test_report_before_ready_conflicts() {
        let app = app();
        let cookie = open_session(&app).await;
        let (status, _, _) = send(&app, post("/results/report", &cookie, "")).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
