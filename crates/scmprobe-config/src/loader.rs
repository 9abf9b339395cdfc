//! Configuration loader with layered merging.

use crate::env::EnvConfig;
use crate::error::{ConfigError, Result};
use crate::types::ScmConfig;
use crate::validate::validate_config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration source in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in defaults.
    Defaults = 0,
    /// Configuration file.
    File = 1,
    /// Environment variables.
    Environment = 2,
}

impl ConfigSource {
    /// Get description for display.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Defaults => "built-in defaults",
            Self::File => "configuration file",
            Self::Environment => "environment variables",
        }
    }
}

/// Builds an [`ScmConfig`] from defaults, an optional file and the environment.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Optional JSON configuration file.
    file: Option<PathBuf>,
    /// Environment overrides.
    env: EnvConfig,
    /// Layers that contributed to the last load.
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a loader that only knows the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file as the second layer.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use the given environment overrides as the last layer.
    #[must_use]
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = env;
        self
    }

    /// Pick up overrides from the process environment.
    ///
    /// # Errors
    /// Returns error if an environment variable cannot be parsed.
    pub fn with_process_env(self) -> Result<Self> {
        let env = EnvConfig::from_env()?;
        Ok(self.with_env(env))
    }

    /// Layers that contributed to the most recent [`load`](Self::load).
    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed.
    pub fn parse_str(path: &Path, content: &str) -> Result<ScmConfig> {
        sonic_rs::from_str(content).map_err(|e| ConfigError::json(path, &e))
    }

    /// Load a configuration file.
    fn load_config_file(path: &Path) -> Result<ScmConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, &e))?;
        Self::parse_str(path, &content)
    }

    /// Merge all layers and validate the result.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or the result is invalid.
    pub fn load(&mut self) -> Result<ScmConfig> {
        self.sources.clear();
        self.sources.push(ConfigSource::Defaults);

        let mut config = match self.file {
            Some(ref path) => {
                let config = Self::load_config_file(path)?;
                debug!(path = ?path, "loaded configuration file");
                self.sources.push(ConfigSource::File);
                config
            }
            None => ScmConfig::default(),
        };

        if !self.env.is_empty() {
            self.env.apply_to(&mut config);
            self.sources.push(ConfigSource::Environment);
        }

        validate_config(&config)?;
        Ok(config)
    }
}
