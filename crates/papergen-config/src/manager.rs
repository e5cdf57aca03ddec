//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::Settings,
};

/// Resolves `Settings` from file and environment
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Manager reading the default config path and `PAPERGEN_*` variables
    ///
    /// Nested keys use a double underscore, e.g. `PAPERGEN_GEMINI__MODEL`.
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: "PAPERGEN".to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: "PAPERGEN".to_string(),
        }
    }

    /// Use a different environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path of the TOML file consulted by `load`
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Default config path: `<config dir>/papergen/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("papergen")
            .join("config.toml")
    }

    /// Load settings; a missing file is not an error
    pub fn load(&self) -> Result<Settings> {
        debug!(path = %self.config_path.display(), prefix = %self.env_prefix, "Loading configuration");

        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_fallbacks(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, requiring the config file to exist
    pub fn load_required(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(
                self.config_path.display().to_string(),
            ));
        }
        self.load()
    }

    /// Write settings as TOML to the configured path
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        let toml = toml::to_string_pretty(settings)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
