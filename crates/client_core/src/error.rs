use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered and refused the request with a readable reason.
    #[error("service rejected request: {0}")]
    Rejected(#[from] ApiError),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request to record service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid service payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid service url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("event feed connection failed: {0}")]
    EventFeed(String),
}

impl ServiceError {
    /// Text to show next to the form field that triggered the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(api) => api.message.clone(),
            Self::Status { status, body } if body.trim().is_empty() => {
                format!("Request failed with HTTP {status}")
            }
            Self::Status { body, .. } => body.trim().to_string(),
            other => other.to_string(),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Rejected(api) => Some(api.name),
            Self::Status { status, .. } => Some(ErrorCode::from_status(*status)),
            _ => None,
        }
    }
}
