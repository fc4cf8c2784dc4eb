//! Error types for the session client

use std::sync::Arc;
use thiserror::Error;

/// Session client error
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request was rejected as unauthenticated even after a retry
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh token was rejected; session state has been cleared and a
    /// fresh login is required
    #[error("Session expired")]
    SessionExpired,

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport error observed through a shared (deduplicated) request
    #[error("Request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Whether this error is the authentication-failure status that triggers
    /// the refresh-then-retry-once path
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized(_) | ApiError::Server { status: 401, .. }
        )
    }

    /// Rebuild an owned error from a shared outcome.
    ///
    /// Deduplicated requests hand every waiter the same `Arc`'d error; the
    /// variants that carry non-clonable sources degrade to their message.
    pub(crate) fn shared(err: Arc<ApiError>) -> ApiError {
        match &*err {
            ApiError::Server { status, message } => ApiError::Server {
                status: *status,
                message: message.clone(),
            },
            ApiError::NotFound(m) => ApiError::NotFound(m.clone()),
            ApiError::Unauthorized(m) => ApiError::Unauthorized(m.clone()),
            ApiError::SessionExpired => ApiError::SessionExpired,
            ApiError::InvalidResponse(m) => ApiError::InvalidResponse(m.clone()),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Result type for session client operations
pub type Result<T> = std::result::Result<T, ApiError>;
