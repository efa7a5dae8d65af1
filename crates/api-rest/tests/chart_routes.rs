use api_rest::{router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use openspace_core::{
    ChartPageController, ChartResult, CoreConfig, LookupResponse, OfflinePatientLookup,
    PatientId, PatientLookup, SessionStore,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceExt;

/// Answers every lookup with the same payload.
struct StubLookup(Value);

impl PatientLookup for StubLookup {
    fn get_by_id(&self, _id: PatientId) -> impl Future<Output = ChartResult<LookupResponse>> + Send {
        std::future::ready(Ok(LookupResponse::found(self.0.clone())))
    }
}

fn app_with<L: PatientLookup + 'static>(lookup: L) -> (Router, SessionStore) {
    let sessions = SessionStore::new();
    let controller = ChartPageController::new(Arc::new(CoreConfig::default()), lookup);
    let app = router(AppState::new(controller, sessions.clone()));
    (app, sessions)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of the Set-Cookie header.
fn issued_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie should be issued")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_missing_id_redirects_to_patient_list() {
    let (app, _) = app_with(OfflinePatientLookup);

    for uri in ["/patient-chart", "/patient-chart?tab=results", "/patient-chart?id=abc"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], "/patients");
        assert!(body_text(response).await.is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn test_leading_zero_or_oversized_id_redirects() {
    let (app, _) = app_with(OfflinePatientLookup);

    for uri in [
        "/patient-chart?id=007",
        "/patient-chart?id=9223372036854775808",
        "/patient-chart?id&tab",
        "/patient-chart?id=%FF",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], "/patients");
    }
}

#[tokio::test]
async fn test_repeated_query_parameters_keep_last_value() {
    let (app, _) = app_with(OfflinePatientLookup);

    let response = app
        .clone()
        .oneshot(get("/patient-chart?id=5&id=6", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("MRN: MRN000006"));
    assert!(html.contains("href=\"/patient-chart?id=6\""));

    let response = app
        .oneshot(get("/patient-chart?id=5&tab=mar&tab=notes", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("data-content=\"notes\""));
    assert!(!html.contains("data-content=\"mar\""));
}

#[tokio::test]
async fn test_failed_lookup_renders_placeholder_chart() {
    let (app, _) = app_with(OfflinePatientLookup);

    let response = app
        .oneshot(get("/patient-chart?id=42", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = issued_cookie(&response);
    assert!(cookie.starts_with("openspace_session="));

    let html = body_text(response).await;
    assert!(html.contains("MRN: MRN000042"));
    assert!(html.contains("Smith, John"));
    assert!(html.contains("data-content=\"summary\""));
}

#[tokio::test]
async fn test_unknown_tab_falls_back_to_summary() {
    let (app, _) = app_with(OfflinePatientLookup);

    for tab in ["nonexistent-tab", "work-list", "intake-output", "education"] {
        let uri = format!("/patient-chart?id=3&tab={tab}");
        let response = app.clone().oneshot(get(&uri, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("data-content=\"summary\""), "tab {tab}");
    }
}

#[tokio::test]
async fn test_known_tab_renders_its_content() {
    let (app, _) = app_with(OfflinePatientLookup);

    let response = app
        .oneshot(get("/patient-chart?id=3&tab=care-plan", None))
        .await
        .unwrap();
    let html = body_text(response).await;

    assert!(html.contains("data-content=\"care-plan\""));
    assert!(html.contains("<a href=\"#\" class=\"subnav-tab active\">All</a>"));
}

#[tokio::test]
async fn test_open_patient_ledger_follows_session_cookie() {
    let (app, sessions) = app_with(OfflinePatientLookup);

    let first = app
        .clone()
        .oneshot(get("/patient-chart?id=7", None))
        .await
        .unwrap();
    let cookie = issued_cookie(&first);

    for uri in ["/patient-chart?id=3", "/patient-chart?id=7&tab=mar", "/patient-chart?id=%207"] {
        let response = app.clone().oneshot(get(uri, Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers().get(header::SET_COOKIE).is_none(),
            "known session must not be reissued"
        );
    }

    let response = app
        .clone()
        .oneshot(get("/api/session/open-patients", Some(&cookie)))
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(
        body,
        json!({
            "open_patients": [
                {"id": 7, "name": "Smith, John"},
                {"id": 3, "name": "Smith, John"}
            ]
        })
    );
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_open_patients_without_session_is_empty() {
    let (app, sessions) = app_with(OfflinePatientLookup);

    let response = app
        .oneshot(get(
            "/api/session/open-patients",
            Some("openspace_session=not-a-session"),
        ))
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(body, json!({"open_patients": []}));
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_patient_name_markup_is_escaped() {
    let (app, _) = app_with(StubLookup(json!({
        "id": 5,
        "first_name": "John",
        "last_name": "<script>alert('x')</script>",
    })));

    let response = app
        .oneshot(get("/patient-chart?id=5", None))
        .await
        .unwrap();
    let html = body_text(response).await;

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;, John"));
}

#[tokio::test]
async fn test_tab_registry_endpoint() {
    let (app, _) = app_with(OfflinePatientLookup);

    let response = app.oneshot(get("/api/tabs", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let tabs = body["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 11);
    assert_eq!(tabs[0]["id"], "summary");

    let by_id = |id: &str| tabs.iter().find(|t| t["id"] == id).unwrap().clone();
    assert_eq!(by_id("mar")["special"], true);
    assert_eq!(by_id("mar")["has_content"], true);
    assert_eq!(by_id("work-list")["has_content"], false);
    assert_eq!(by_id("summary")["has_content"], true);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let (app, _) = app_with(OfflinePatientLookup);

    let response = app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["ok"], true);

    let response = app
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["paths"]["/api/tabs"].is_object());
}
