//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. The
//! intent is to avoid reading process-wide environment variables during request handling, which
//! can lead to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::{
    DEFAULT_APP_NAME, DEFAULT_PATIENT_API_TIMEOUT_SECS, DEFAULT_PATIENT_API_URL,
    DEFAULT_PATIENT_LIST_PATH, DEFAULT_SESSION_IDLE_MINUTES,
};
use crate::{ChartError, ChartResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_api_url: String,
    patient_api_timeout: Duration,
    patient_list_path: String,
    app_name: String,
    session_idle: chrono::Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::InvalidInput` if:
    /// - the patient API URL or app name is empty,
    /// - the patient list path is empty or not absolute,
    /// - the API timeout or the session idle lifetime is zero.
    pub fn new(
        patient_api_url: String,
        patient_api_timeout: Duration,
        patient_list_path: String,
        app_name: String,
        session_idle: chrono::Duration,
    ) -> ChartResult<Self> {
        let patient_api_url = patient_api_url.trim().trim_end_matches('/').to_string();
        if patient_api_url.is_empty() {
            return Err(ChartError::InvalidInput(
                "patient API URL cannot be empty".into(),
            ));
        }

        if !patient_list_path.starts_with('/') {
            return Err(ChartError::InvalidInput(
                "patient list path must start with '/'".into(),
            ));
        }

        if app_name.trim().is_empty() {
            return Err(ChartError::InvalidInput("app name cannot be empty".into()));
        }

        if patient_api_timeout.is_zero() {
            return Err(ChartError::InvalidInput(
                "patient API timeout must be greater than zero".into(),
            ));
        }

        if session_idle <= chrono::Duration::zero() {
            return Err(ChartError::InvalidInput(
                "session idle lifetime must be greater than zero".into(),
            ));
        }

        Ok(Self {
            patient_api_url,
            patient_api_timeout,
            patient_list_path,
            app_name: app_name.trim().to_string(),
            session_idle,
        })
    }

    pub fn patient_api_url(&self) -> &str {
        &self.patient_api_url
    }

    pub fn patient_api_timeout(&self) -> Duration {
        self.patient_api_timeout
    }

    pub fn patient_list_path(&self) -> &str {
        &self.patient_list_path
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn session_idle(&self) -> chrono::Duration {
        self.session_idle
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            patient_api_url: DEFAULT_PATIENT_API_URL.into(),
            patient_api_timeout: Duration::from_secs(DEFAULT_PATIENT_API_TIMEOUT_SECS),
            patient_list_path: DEFAULT_PATIENT_LIST_PATH.into(),
            app_name: DEFAULT_APP_NAME.into(),
            session_idle: chrono::Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES),
        }
    }
}

/// Trim an optional environment value, treating empty/whitespace as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a positive whole number of units from an optional string value.
fn positive_from_env_value(value: Option<String>, what: &str) -> ChartResult<Option<u64>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err(ChartError::InvalidInput(format!(
            "{what} must be a positive integer, got {value:?}"
        ))),
        Ok(n) => Ok(Some(n)),
    }
}

/// Parse the patient API timeout from an optional string value (seconds).
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn api_timeout_from_env_value(value: Option<String>) -> ChartResult<Duration> {
    let secs = positive_from_env_value(value, "patient API timeout")?
        .unwrap_or(DEFAULT_PATIENT_API_TIMEOUT_SECS);
    Ok(Duration::from_secs(secs))
}

/// Parse the session idle lifetime from an optional string value (minutes).
///
/// If `value` is `None` or empty/whitespace, returns the default lifetime.
pub fn session_idle_from_env_value(value: Option<String>) -> ChartResult<chrono::Duration> {
    let minutes = match positive_from_env_value(value, "session idle lifetime")? {
        Some(n) => i64::try_from(n).map_err(|_| idle_out_of_range())?,
        None => DEFAULT_SESSION_IDLE_MINUTES,
    };
    chrono::Duration::try_minutes(minutes).ok_or_else(idle_out_of_range)
}

fn idle_out_of_range() -> ChartError {
    ChartError::InvalidInput("session idle lifetime is out of range".into())
}

/// Resolve a string setting, falling back to `default` when unset or blank.
pub fn string_from_env_value(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}
