use openspace_types::IdError;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid patient id: {0}")]
    InvalidPatientId(#[from] IdError),
    #[error("failed to build patient API client: {0}")]
    LookupClient(reqwest::Error),
    #[error("patient API request failed: {0}")]
    LookupTransport(reqwest::Error),
    #[error("patient API returned an invalid response: {0}")]
    LookupDecode(reqwest::Error),
    #[error("patient API is not configured")]
    LookupUnavailable,
    #[error("failed to serialize chart data: {0}")]
    Serialization(serde_json::Error),
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;
