use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error names reported by the record service in the `name` field of a
/// rejection body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    BadRequest,
    NotAuthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Unprocessable,
    TooManyRequests,
    GeneralError,
    Unavailable,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::NotAuthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Unprocessable,
            429 => Self::TooManyRequests,
            500 => Self::GeneralError,
            503 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

/// Rejection body returned by the record service. `message` is human
/// readable and is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{name:?}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub name: ErrorCode,
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl ApiError {
    pub fn new(name: ErrorCode, code: u16, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
            code,
            class_name: None,
        }
    }
}
