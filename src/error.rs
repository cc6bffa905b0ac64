use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call against the brokerage backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("resource not found")]
    NotFound,

    #[error("not authorized ({0})")]
    Unauthorized(StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session storage failed: {0}")]
    Session(#[from] std::io::Error),
}

impl ApiError {
    /// Classify a non-success status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(status),
            _ => ApiError::Status { status, body },
        }
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
