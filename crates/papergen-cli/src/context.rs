// Application context shared by commands

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use papergen_config::{ConfigManager, Settings};
use papergen_generation::{HumanizerConfig, PaperPipeline, PipelineOptions};
use papergen_github::{GitHubClient, GitHubClientConfig, RepositoryCloner};
use papergen_providers::{GoogleProvider, Provider};
use tracing::{debug, info};

use crate::error::CliResult;

/// Resolved settings plus the services built from them
pub struct AppContext {
    pub settings: Settings,
    pub github: Arc<GitHubClient>,
}

impl AppContext {
    /// Load settings from `config_path` (or the default location) and the environment
    pub fn load(config_path: Option<&PathBuf>) -> CliResult<Self> {
        let manager = match config_path {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };
        let settings = if config_path.is_some() {
            manager.load_required()?
        } else {
            manager.load()?
        };
        debug!(path = %manager.config_path().display(), "Configuration loaded");
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> CliResult<Self> {
        let github = GitHubClient::new(GitHubClientConfig {
            api_base: settings.github.api_base.clone(),
            token: settings.github.token.clone(),
            cache_ttl: Duration::from_secs(settings.github.cache_ttl_secs),
        })?;
        Ok(Self {
            settings,
            github: Arc::new(github),
        })
    }

    pub fn cloner(&self) -> RepositoryCloner {
        RepositoryCloner::new(self.settings.github.workdir.clone())
    }

    /// Gemini provider when an API key is configured
    pub fn provider(&self) -> CliResult<Option<Arc<dyn Provider>>> {
        let gemini = &self.settings.gemini;
        let Some(key) = gemini.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let provider = match &gemini.base_url {
            Some(base_url) => GoogleProvider::with_base_url(key, base_url.clone())?,
            None => GoogleProvider::new(key)?,
        };
        Ok(Some(Arc::new(provider)))
    }

    /// Pipeline options from settings, before per-command overrides
    pub fn pipeline_options(&self) -> PipelineOptions {
        let gemini = &self.settings.gemini;
        let generation = &self.settings.generation;
        PipelineOptions {
            model: gemini.model.clone(),
            temperature: gemini.temperature,
            max_output_tokens: gemini.max_output_tokens,
            humanize: generation.humanize,
            max_chunks: generation.max_chunks,
            seed: None,
            humanizer: HumanizerConfig::default(),
        }
    }

    /// Pipeline wired to the configured services
    pub fn pipeline(&self, options: PipelineOptions, use_model: bool) -> CliResult<PaperPipeline> {
        let mut pipeline = PaperPipeline::new(Arc::clone(&self.github))
            .with_cloner(self.cloner())
            .with_options(options);

        if use_model {
            if let Some(provider) = self.provider()? {
                info!(provider = provider.id(), "Using model provider");
                pipeline = pipeline.with_provider(provider);
            }
        }
        Ok(pipeline)
    }
}
