use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use openspace_core::config::{
    api_timeout_from_env_value, session_idle_from_env_value, string_from_env_value,
};
use openspace_core::{
    ChartPageController, CoreConfig, HttpPatientLookup, SessionStore, DEFAULT_APP_NAME,
    DEFAULT_PATIENT_API_URL, DEFAULT_PATIENT_LIST_PATH,
};

/// How often idle sessions are swept.
const SESSION_REAPER_INTERVAL: Duration = Duration::from_secs(60);

/// Main entry point for the Openspace chart server
///
/// Serves the patient chart and its JSON endpoints on port 3000 (configurable via
/// `OPENSPACE_ADDR`) and sweeps idle sessions in the background.
///
/// # Environment Variables
/// - `OPENSPACE_ADDR`: server address (default: "0.0.0.0:3000")
/// - `PATIENT_API_URL`: patient API base URL (default: "http://localhost:5000/api")
/// - `PATIENT_API_TIMEOUT_SECS`: per-call timeout (default: 30)
/// - `PATIENT_LIST_PATH`: redirect target for chart requests without a patient id (default: "/patients")
/// - `OPENSPACE_APP_NAME`: page title suffix (default: "Openspace EHR")
/// - `SESSION_IDLE_MINUTES`: idle session lifetime (default: 24)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("openspace_run=info".parse()?)
                .add_directive("openspace_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("OPENSPACE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        string_from_env_value(std::env::var("PATIENT_API_URL").ok(), DEFAULT_PATIENT_API_URL),
        api_timeout_from_env_value(std::env::var("PATIENT_API_TIMEOUT_SECS").ok())?,
        string_from_env_value(
            std::env::var("PATIENT_LIST_PATH").ok(),
            DEFAULT_PATIENT_LIST_PATH,
        ),
        string_from_env_value(std::env::var("OPENSPACE_APP_NAME").ok(), DEFAULT_APP_NAME),
        session_idle_from_env_value(std::env::var("SESSION_IDLE_MINUTES").ok())?,
    )?);

    tracing::info!("++ Starting Openspace chart on {}", addr);
    tracing::info!("++ Patient API at {}", cfg.patient_api_url());

    let lookup = HttpPatientLookup::new(&cfg)?;
    let sessions = SessionStore::new();
    let controller = ChartPageController::new(cfg.clone(), lookup);

    let reaper_sessions = sessions.clone();
    let session_idle = cfg.session_idle();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_REAPER_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = reaper_sessions.purge_idle(chrono::Utc::now(), session_idle);
            if purged > 0 {
                tracing::debug!("purged {} idle sessions", purged);
            }
        }
    });

    let app = api_rest::router(AppState::new(controller, sessions));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
