//! Patient API client.
//!
//! The chart only needs one call: fetch a patient by id. The API answers with an envelope
//! `{ "success": bool, "data": {...} }`; anything short of a successful, non-empty payload is
//! handled by the caller as "no data".

use crate::config::CoreConfig;
use crate::error::{ChartError, ChartResult};
use openspace_types::PatientId;
use serde::Deserialize;
use std::future::Future;

/// Response envelope of the patient API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl LookupResponse {
    pub fn found(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Source of patient records.
pub trait PatientLookup: Send + Sync {
    /// Fetches the patient with `id`.
    ///
    /// # Errors
    ///
    /// Returns a `ChartError` when the API cannot be reached or answers with something that is
    /// not a response envelope.
    fn get_by_id(&self, id: PatientId) -> impl Future<Output = ChartResult<LookupResponse>> + Send;
}

/// Patient API over HTTP: `GET {base}/patients/{id}`.
#[derive(Clone, Debug)]
pub struct HttpPatientLookup {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPatientLookup {
    /// Builds a client using the configured base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::LookupClient` if the HTTP client cannot be constructed.
    pub fn new(cfg: &CoreConfig) -> ChartResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.patient_api_timeout())
            .build()
            .map_err(ChartError::LookupClient)?;

        Ok(Self {
            base_url: cfg.patient_api_url().to_string(),
            client,
        })
    }

    pub fn patient_url(&self, id: PatientId) -> String {
        format!("{}/patients/{}", self.base_url, id)
    }
}

impl PatientLookup for HttpPatientLookup {
    fn get_by_id(&self, id: PatientId) -> impl Future<Output = ChartResult<LookupResponse>> + Send {
        let request = self
            .client
            .get(self.patient_url(id))
            .header(reqwest::header::ACCEPT, "application/json");

        async move {
            let response = request.send().await.map_err(ChartError::LookupTransport)?;
            response
                .json::<LookupResponse>()
                .await
                .map_err(ChartError::LookupDecode)
        }
    }
}

/// A lookup with no backend; every call fails, so charts show the placeholder record.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflinePatientLookup;

impl PatientLookup for OfflinePatientLookup {
    fn get_by_id(&self, _id: PatientId) -> impl Future<Output = ChartResult<LookupResponse>> + Send {
        std::future::ready(Err(ChartError::LookupUnavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_url_joins_base() {
        let cfg = CoreConfig::new(
            "http://api.local/api/".into(),
            std::time::Duration::from_secs(1),
            "/patients".into(),
            "Openspace EHR".into(),
            chrono::Duration::minutes(1),
        )
        .unwrap();
        let lookup = HttpPatientLookup::new(&cfg).unwrap();

        assert_eq!(
            lookup.patient_url(PatientId::new(12).unwrap()),
            "http://api.local/api/patients/12"
        );
    }

    #[test]
    fn test_envelope_fields_default() {
        let resp: LookupResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, LookupResponse::not_found());

        let resp: LookupResponse =
            serde_json::from_str(r#"{"success":true,"data":{"id":1}}"#).unwrap();
        assert!(resp.success);
        assert!(resp.data.is_some());
    }

    fn lookup_at(base: String) -> HttpPatientLookup {
        let cfg = CoreConfig::new(
            base,
            std::time::Duration::from_secs(5),
            "/patients".into(),
            "Openspace EHR".into(),
            chrono::Duration::minutes(1),
        )
        .unwrap();
        HttpPatientLookup::new(&cfg).unwrap()
    }

    /// Serves one canned HTTP response, returning the base URL to call.
    async fn serve_once(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn test_unreachable_api_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let lookup = lookup_at(format!("http://{addr}/api"));
        let id = PatientId::new(42).unwrap();

        let result = lookup.get_by_id(id).await;
        assert!(matches!(result, Err(ChartError::LookupTransport(_))), "{result:?}");

        let record = crate::resolve::resolve_patient(&lookup, id).await;
        assert_eq!(record, crate::patient::PatientRecord::placeholder(id));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\n\
             Connection: close\r\n\r\nnot json!",
        )
        .await;
        let lookup = lookup_at(base);
        let id = PatientId::new(7).unwrap();

        let result = lookup.get_by_id(id).await;
        assert!(matches!(result, Err(ChartError::LookupDecode(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_http_envelope_is_decoded() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 51\r\n\
             Connection: close\r\n\r\n{\"success\":true,\"data\":{\"id\":7,\"first_name\":\"Ada\"}}",
        )
        .await;
        let lookup = lookup_at(base);
        let id = PatientId::new(7).unwrap();

        let record = crate::resolve::resolve_patient(&lookup, id).await;
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_offline_lookup_always_fails() {
        let result = OfflinePatientLookup
            .get_by_id(PatientId::new(1).unwrap())
            .await;
        assert!(matches!(result, Err(ChartError::LookupUnavailable)));
    }
}
