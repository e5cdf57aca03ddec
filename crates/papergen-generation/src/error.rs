//! Error types for paper generation

use papergen_github::GitHubError;
use papergen_providers::ProviderError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ProcessingStatus;

/// Errors that can occur during paper generation
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request is missing required input or is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Neither a repository nor a model provider is available
    #[error("No model provider configured and no repository to analyze")]
    NoProvider,

    /// Repository ingestion failed
    #[error("Repository ingestion failed: {0}")]
    Ingestion(#[from] GitHubError),

    /// Model provider failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Unknown job id
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// The job has not produced a document
    #[error("Job {id} is not completed (status: {status})")]
    JobNotReady {
        /// Job id
        id: Uuid,
        /// Current status
        status: ProcessingStatus,
    },

    /// The job ran and failed
    #[error("Job {id} failed: {message}")]
    JobFailed {
        /// Job id
        id: Uuid,
        /// Error reported by the pipeline
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;
