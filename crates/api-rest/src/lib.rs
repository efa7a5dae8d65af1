//! # API REST
//!
//! HTTP surface for the Openspace chart.
//!
//! Handles:
//! - the chart page (`GET /patient-chart?id=&tab=`) with axum
//! - session cookies tying requests to a [`SessionStore`] entry
//! - JSON endpoints and their OpenAPI document
//!
//! Chart semantics live in `openspace-core`; this crate only adapts them to HTTP.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{FromRef, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Local, Utc};
use openspace_core::{
    select_content, ChartOutcome, ChartPageController, ChartRequest, PatientLookup, SessionId,
    SessionStore, CHART_TABS, SESSION_COOKIE_NAME,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across request handlers.
pub struct AppState<L> {
    controller: Arc<ChartPageController<L>>,
    sessions: SessionStore,
}

impl<L> AppState<L> {
    pub fn new(controller: ChartPageController<L>, sessions: SessionStore) -> Self {
        Self {
            controller: Arc::new(controller),
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

impl<L> FromRef<AppState<L>> for SessionStore {
    fn from_ref(state: &AppState<L>) -> Self {
        state.sessions.clone()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One entry of the chart tab registry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TabRes {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub special: bool,
    /// `false` for tabs that fall back to the summary content.
    pub has_content: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListTabsRes {
    pub tabs: Vec<TabRes>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpenPatientRes {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpenPatientsRes {
    pub open_patients: Vec<OpenPatientRes>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_tabs, open_patients),
    components(schemas(HealthRes, TabRes, ListTabsRes, OpenPatientRes, OpenPatientsRes))
)]
pub struct ApiDoc;

/// Builds the application router.
pub fn router<L>(state: AppState<L>) -> Router
where
    L: PatientLookup + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/patient-chart", get(chart_page::<L>))
        .route("/api/tabs", get(list_tabs))
        .route("/api/session/open-patients", get(open_patients))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Reads the session id from the request cookies, if it names a live session.
fn session_from_headers(headers: &HeaderMap, sessions: &SessionStore) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE_NAME)
        .filter_map(|(_, value)| SessionId::parse(value))
        .find(|id| sessions.contains(*id))
}

fn session_cookie(id: SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={id}; HttpOnly; Path=/; SameSite=Lax"
    ))
    .ok()
}

/// Patient chart page.
///
/// Renders the chart for `id` on the requested `tab`, recording the patient in the caller's
/// open-patient ledger. Without a valid `id` the response is a `302` to the patient list.
async fn chart_page<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    L: PatientLookup + 'static,
{
    let request = ChartRequest::from_pairs(pairs);
    let now = Utc::now();
    let existing = session_from_headers(&headers, &state.sessions);
    let session_id = existing.unwrap_or_else(|| {
        let id = state.sessions.create(now);
        tracing::debug!(session = %id, "started chart session");
        id
    });
    let session = state.sessions.load(session_id, now);

    let (outcome, session) = state
        .controller
        .handle(&request, session, Local::now().naive_local())
        .await;
    state.sessions.save(session_id, session, now);

    let mut response = match outcome {
        ChartOutcome::Redirect(location) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        ChartOutcome::Page(page) => Html(page.html).into_response(),
    };

    if existing.is_none() {
        if let Some(cookie) = session_cookie(session_id) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }

    response
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint.
///
/// Used for monitoring and load balancer health checks.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Openspace chart is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/tabs",
    responses(
        (status = 200, description = "Chart tab registry in navigation order", body = ListTabsRes)
    )
)]
/// List the chart tab registry.
async fn list_tabs() -> Json<ListTabsRes> {
    let tabs = CHART_TABS
        .iter()
        .map(|meta| TabRes {
            id: meta.tab.id().into(),
            label: meta.label.into(),
            icon: meta.icon.into(),
            special: meta.special,
            has_content: select_content(meta.tab.id()).kind().id() == meta.tab.id(),
        })
        .collect();
    Json(ListTabsRes { tabs })
}

#[utoipa::path(
    get,
    path = "/api/session/open-patients",
    responses(
        (status = 200, description = "Open patient tabs of the caller's session", body = OpenPatientsRes)
    )
)]
/// List the caller's open patient tabs.
///
/// Returns an empty list when the request carries no live session; no session is created.
async fn open_patients(
    State(sessions): State<SessionStore>,
    headers: HeaderMap,
) -> Json<OpenPatientsRes> {
    let open_patients = session_from_headers(&headers, &sessions)
        .map(|id| sessions.load(id, Utc::now()))
        .map(|ctx| {
            ctx.open_patients()
                .iter()
                .map(|entry| OpenPatientRes {
                    id: entry.patient_id.get(),
                    name: entry.display_name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    Json(OpenPatientsRes { open_patients })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
