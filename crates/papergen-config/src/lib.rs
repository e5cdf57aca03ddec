//! Papergen configuration
//!
//! Settings are resolved from built-in defaults, an optional TOML file and
//! `PAPERGEN_*` environment variables, in that order of precedence.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{GeminiSettings, GenerationSettings, GitHubSettings, Settings};
