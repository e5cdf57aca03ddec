//! Shared HTTP client for papergen
//!
//! Every outbound call (GitHub REST, Gemini) goes through the types in this
//! crate so timeouts, user agent and retry behaviour stay consistent.
//!
//! - **Trait-based design**: mockable via `HttpClientTrait`
//! - **Presets**: `HttpConfig::github()` and `HttpConfig::ai_provider()`
//! - **Retries**: idempotent GETs are retried with exponential backoff

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;

pub use client::{shared_client, HttpClient, HttpClientTrait};
pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use middleware::{RetryConfig, RetryMiddleware};

pub use reqwest::{header, Method, Response, StatusCode};
