//! Error types for the Crewdeck SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Debug, Error)]
pub enum SdkError {
    /// Underlying API call failed
    #[error("API error: {0}")]
    Api(#[from] crewdeck_api_client::ApiError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No authenticated user is available for a user-scoped operation
    #[error("No authenticated user")]
    NoSession,
}
