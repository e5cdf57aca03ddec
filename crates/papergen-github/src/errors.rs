//! GitHub ingestion error types

use papergen_http::{HttpError, StatusCode};
use thiserror::Error;

/// Errors that can occur while ingesting a repository
#[derive(Debug, Error)]
pub enum GitHubError {
    /// API error from GitHub
    #[error("GitHub API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// git clone or repository inspection failed
    #[error("Git error: {0}")]
    GitError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl GitHubError {
    /// Create a new API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        GitHubError::ApiError(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        GitHubError::NotFound(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GitHubError::InvalidInput(msg.into())
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GitHubError::RateLimitExceeded)
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::NotFound(_))
    }
}

impl From<HttpError> for GitHubError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::HttpStatus { status, message } => match status {
                StatusCode::NOT_FOUND => GitHubError::NotFound(message),
                StatusCode::UNAUTHORIZED => GitHubError::AuthError(message),
                StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimitExceeded,
                StatusCode::FORBIDDEN if message.to_lowercase().contains("rate limit") => {
                    GitHubError::RateLimitExceeded
                }
                StatusCode::FORBIDDEN => GitHubError::AuthError(message),
                other => GitHubError::ApiError(format!("{}: {}", other, message)),
            },
            HttpError::RequestFailed(e) => GitHubError::NetworkError(e.to_string()),
            HttpError::Timeout(d) => GitHubError::NetworkError(format!("timed out after {d:?}")),
            other => GitHubError::ApiError(other.to_string()),
        }
    }
}

impl From<git2::Error> for GitHubError {
    fn from(err: git2::Error) -> Self {
        GitHubError::GitError(err.message().to_string())
    }
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode, message: &str) -> HttpError {
        HttpError::HttpStatus {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_not_found_mapping() {
        let err = GitHubError::from(status_error(StatusCode::NOT_FOUND, "Not Found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rate_limit_mapping() {
        let err = GitHubError::from(status_error(
            StatusCode::FORBIDDEN,
            "API rate limit exceeded for 1.2.3.4",
        ));
        assert!(err.is_rate_limit());

        let err = GitHubError::from(status_error(StatusCode::TOO_MANY_REQUESTS, ""));
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_forbidden_without_rate_limit_is_auth() {
        let err = GitHubError::from(status_error(StatusCode::FORBIDDEN, "Resource not accessible"));
        assert!(matches!(err, GitHubError::AuthError(_)));
    }

    #[test]
    fn test_server_error_mapping() {
        let err = GitHubError::from(status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
        assert!(err.to_string().contains("500"));
    }
}
