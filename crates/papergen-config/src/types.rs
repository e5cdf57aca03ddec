//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Generative model settings
    pub gemini: GeminiSettings,
    /// GitHub access settings
    pub github: GitHubSettings,
    /// Document generation settings
    pub generation: GenerationSettings,
}

/// Gemini model settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key; falls back to `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Override for the models endpoint (proxies, tests)
    pub base_url: Option<String>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
    /// Output token cap per section
    pub max_output_tokens: Option<usize>,
}

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubSettings {
    /// Personal access token; falls back to `GITHUB_TOKEN`
    pub token: Option<String>,
    /// REST API root
    pub api_base: String,
    /// Lifetime of cached repository snapshots
    pub cache_ttl_secs: u64,
    /// Parent directory for scratch clones (system temp when unset)
    pub workdir: Option<PathBuf>,
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Target length of the whole document
    pub word_count: usize,
    /// Run the humanizer over model output
    pub humanize: bool,
    /// Code chunks included in a section prompt
    pub max_chunks: usize,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: None,
            temperature: 0.7,
            max_output_tokens: None,
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.github.com".to_string(),
            cache_ttl_secs: 3600,
            workdir: None,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            word_count: 3000,
            humanize: true,
            max_chunks: 10,
        }
    }
}

impl Settings {
    /// Fill unset secrets from the conventional unprefixed variables
    pub fn apply_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if is_blank(&self.gemini.api_key) {
            self.gemini.api_key = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty());
        }
        if is_blank(&self.github.token) {
            self.github.token = lookup("GITHUB_TOKEN").filter(|v| !v.is_empty());
        }
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gemini.model must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ConfigError::Validation(format!(
                "gemini.temperature must be between 0.0 and 2.0, got {}",
                self.gemini.temperature
            )));
        }
        if self.github.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "github.api_base must not be empty".to_string(),
            ));
        }
        if self.generation.word_count == 0 {
            return Err(ConfigError::Validation(
                "generation.word_count must be greater than 0".to_string(),
            ));
        }
        if self.generation.max_chunks == 0 {
            return Err(ConfigError::Validation(
                "generation.max_chunks must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a model key is available
    pub fn has_model_credentials(&self) -> bool {
        !is_blank(&self.gemini.api_key)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
