//! Error types for the providers module

use papergen_http::HttpError;
use thiserror::Error;

/// Errors that can occur when interacting with providers
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    AuthError,

    /// Rate limited by provider
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic provider error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid model specified
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<HttpError> for ProviderError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::HttpStatus { status, .. } => match status.as_u16() {
                401 | 403 => ProviderError::AuthError,
                429 => ProviderError::RateLimited(60),
                _ => ProviderError::ProviderError(format!("API error: {}", status)),
            },
            HttpError::RequestFailed(e) if e.is_timeout() => {
                ProviderError::ProviderError("Request timeout".to_string())
            }
            HttpError::RequestFailed(e) if e.is_connect() => {
                ProviderError::NetworkError(e.to_string())
            }
            HttpError::Timeout(_) => ProviderError::ProviderError("Request timeout".to_string()),
            HttpError::Decode(msg) => ProviderError::SerializationError(msg),
            HttpError::InvalidUrl(msg) | HttpError::BuildError(msg) | HttpError::InvalidProxy(msg) => {
                ProviderError::ConfigError(msg)
            }
            other => ProviderError::ProviderError(other.to_string()),
        }
    }
}
