use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MlResult<T> = Result<T, MlError>;

impl From<MlError> for advisor_core::AdvisorError {
    fn from(err: MlError) -> Self {
        advisor_core::AdvisorError::ModelError(err.to_string())
    }
}
