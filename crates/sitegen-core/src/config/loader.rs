//! Layered configuration loading

use super::env_loader::load_from_env;
use super::file_loader::{load_value_from_file, merge_values};
use super::model::Config;
use crate::error::{SitegenError, SitegenResult};
use std::path::PathBuf;

/// Configuration source, applied in the order added
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration file; missing files are skipped
    File(PathBuf),
    /// Process environment variables
    Environment,
    /// Built-in defaults
    Default,
}

/// Configuration loader that merges multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a configuration file source
    pub fn with_file<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_source(ConfigSource::File(path.into()))
    }

    /// Add environment variables as a source
    pub fn with_env(self) -> Self {
        self.with_source(ConfigSource::Environment)
    }

    /// Add default configuration as a source
    pub fn with_defaults(self) -> Self {
        self.with_source(ConfigSource::Default)
    }

    /// Load configuration from all sources, then validate it
    pub fn load(self) -> SitegenResult<Config> {
        let mut config = Config::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    config = Config::default();
                }
                ConfigSource::File(path) => {
                    if let Some(overlay) = load_value_from_file(path)? {
                        let mut current = serde_json::to_value(&config)?;
                        merge_values(&mut current, overlay);
                        config = serde_json::from_value(current).map_err(|e| {
                            SitegenError::config_with_context(
                                format!("Invalid configuration: {}", e),
                                path.display().to_string(),
                            )
                        })?;
                        tracing::debug!("Loaded configuration from {}", path.display());
                    }
                }
                ConfigSource::Environment => {
                    load_from_env(&mut config)?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from defaults, an optional file and the environment
pub fn load_config(path: Option<PathBuf>) -> SitegenResult<Config> {
    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.with_env().load()
}
