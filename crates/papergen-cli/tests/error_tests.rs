//! Error handling tests
//!
//! Tests for CLI error types and user-friendly messages.

use papergen_cli::error::CliError;
use papergen_config::ConfigError;
use papergen_generation::GenerationError;
use papergen_providers::ProviderError;

#[test]
fn test_config_error_user_message() {
    let error = CliError::from(ConfigError::Validation("bad temperature".to_string()));
    let msg = error.user_message();
    assert!(msg.contains("Configuration error"));
    assert!(msg.contains("bad temperature"));
    assert!(msg.contains("PAPERGEN_"));
}

#[test]
fn test_provider_error_user_message() {
    let error = CliError::from(ProviderError::RateLimited(30));
    let msg = error.user_message();
    assert!(msg.contains("Provider error"));
    assert!(msg.contains("--no-llm"));
}

#[test]
fn test_generation_error_user_message() {
    let error = CliError::from(GenerationError::InvalidRequest("topic must not be empty".to_string()));
    let msg = error.user_message();
    assert!(msg.contains("generation failed"));
    assert!(msg.contains("topic must not be empty"));
}

#[test]
fn test_io_error_user_message() {
    let error = CliError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "draft.md"));
    assert!(error.user_message().contains("File operation failed"));
}

#[test]
fn test_technical_details_include_variant() {
    let error = CliError::invalid_argument("x");
    assert!(error.technical_details().contains("InvalidArgument"));
}
