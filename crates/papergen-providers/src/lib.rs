//! Language model providers for papergen
//!
//! A small provider abstraction with a Google Gemini implementation.

pub mod error;
pub mod models;
pub mod provider;
pub mod providers;

pub use error::ProviderError;
pub use models::{ChatRequest, ChatResponse, FinishReason, Message, ModelInfo, TokenUsage};
pub use provider::Provider;
pub use providers::GoogleProvider;
