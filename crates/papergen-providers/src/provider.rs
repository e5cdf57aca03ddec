//! Provider trait

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse, ModelInfo},
};

/// Core trait that all providers must implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the provider's human-readable name
    fn name(&self) -> &str;

    /// Get the list of known models
    fn models(&self) -> Vec<ModelInfo>;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Check if the provider is available and healthy
    async fn health_check(&self) -> Result<bool, ProviderError>;

    /// Whether `model` can be requested from this provider
    fn supports_model(&self, model: &str) -> bool {
        self.models().iter().any(|m| m.id == model)
    }
}
