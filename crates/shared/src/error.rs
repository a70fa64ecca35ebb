use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
    Unknown,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500..=599 => Self::Internal,
            _ => Self::Unknown,
        }
    }
}

/// Error body as sent by the employee backend.
///
/// Only `message` and `error` are read; both are optional because proxies and
/// framework defaults do not always fill them in.
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: ErrorCode::from_status(status),
            message: message.into(),
        }
    }

    /// Builds an error from a non-success response, preferring the JSON `message`
    /// field, then `error`, then the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .or(parsed.error.filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| {
                let raw = body.trim();
                if raw.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    raw.to_string()
                }
            });
        Self::new(status, message)
    }
}
