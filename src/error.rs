use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please log in to continue")]
    NotLoggedIn,

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("You are not allowed to do that")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Map a non-success status plus its body to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::SessionExpired,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Status {
                status,
                message: backend_message(body),
            },
        }
    }
}

/// The backend reports failures as `{ "message": "..." }`.
fn backend_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Something went wrong".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
