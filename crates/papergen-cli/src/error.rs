// CLI error types

use papergen_config::ConfigError;
use papergen_generation::GenerationError;
use papergen_github::GitHubError;
use papergen_providers::ProviderError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Repository error: {0}")]
    Repository(#[from] GitHubError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'papergen --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(e) => {
                format!(
                    "Configuration error: {}\n\nCheck your config file or PAPERGEN_* environment variables.",
                    e
                )
            }
            CliError::Provider(e) => {
                format!(
                    "Provider error: {}\n\nCheck GEMINI_API_KEY or pass --no-llm to build a template paper.",
                    e
                )
            }
            CliError::Repository(e) if e.is_rate_limit() => {
                format!(
                    "GitHub rate limit exceeded: {}\n\nSet GITHUB_TOKEN to raise the limit.",
                    e
                )
            }
            CliError::Repository(e) => format!("Repository error: {}", e),
            CliError::Generation(GenerationError::NoProvider) => {
                "No model provider is configured and no repository was given.\n\n\
                 Set GEMINI_API_KEY, or pass --repo to build a template paper."
                    .to_string()
            }
            CliError::Generation(e) => format!("Paper generation failed: {}", e),
            CliError::Serialization(e) => format!("Could not serialize output: {}", e),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
