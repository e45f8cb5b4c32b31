//! SDK constructors and builder

use crate::client::SitegenClient;
use sitegen_core::{
    codegen::{ArtifactPersister, CodegenFacade, GenerationService},
    config::{Config, load_config},
    error::SitegenResult,
    llm::{ConfiguredModelProvider, ModelProvider},
    router::PromptClassifier,
    session::{ChatHistoryProvider, InMemoryChatHistory, JsonlChatHistory, SessionCache},
    tools::ToolSetFactory,
    workflow::CodegenWorkflow,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl SitegenClient {
    /// Create a client from the default configuration sources.
    ///
    /// Built-in defaults are overridden by environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate or a model
    /// client cannot be constructed.
    pub fn new() -> SitegenResult<Self> {
        Self::builder(load_config(None)?).build()
    }

    /// Create a client from an already constructed configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sitegen_sdk::{Config, SitegenClient};
    ///
    /// let client = SitegenClient::with_config(Config::default())?;
    /// # Ok::<(), sitegen_sdk::SitegenError>(())
    /// ```
    pub fn with_config(config: Config) -> SitegenResult<Self> {
        Self::builder(config).build()
    }

    /// Create a client from a configuration file.
    ///
    /// The file format (TOML, YAML or JSON) is chosen by extension;
    /// environment variables still take precedence over its values.
    pub fn with_config_file<P: AsRef<Path>>(config_file: P) -> SitegenResult<Self> {
        let config_path = config_file.as_ref();
        tracing::info!("Loading SDK config from: {}", config_path.display());

        let config = load_config(Some(config_path.to_path_buf()))?;
        tracing::info!(
            provider = ?config.provider,
            output_root = %config.output_root.display(),
            "SDK config loaded"
        );

        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> SitegenClientBuilder {
        SitegenClientBuilder::new(config)
    }
}

/// Assembles a [`SitegenClient`], with optional replacements for the model
/// provider, chat history store and scaffold tool factory
pub struct SitegenClientBuilder {
    config: Config,
    models: Option<Arc<dyn ModelProvider>>,
    history: Option<Arc<dyn ChatHistoryProvider>>,
    tools: Option<Arc<dyn ToolSetFactory>>,
}

impl SitegenClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            models: None,
            history: None,
            tools: None,
        }
    }

    /// Serve every model role from `models` instead of the configured clients
    pub fn with_model_provider(mut self, models: Arc<dyn ModelProvider>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_history(mut self, history: Arc<dyn ChatHistoryProvider>) -> Self {
        self.history = Some(history);
        self
    }

    /// Persist chat history as JSON lines under `dir`
    pub fn with_history_dir<P: Into<PathBuf>>(self, dir: P) -> Self {
        self.with_history(Arc::new(JsonlChatHistory::new(dir)))
    }

    pub fn with_tool_factory(mut self, tools: Arc<dyn ToolSetFactory>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_output_root<P: Into<PathBuf>>(mut self, output_root: P) -> Self {
        self.config.output_root = output_root.into();
        self
    }

    /// Validate the configuration and wire the engine
    pub fn build(self) -> SitegenResult<SitegenClient> {
        let config = self.config;
        config.validate()?;

        let models: Arc<dyn ModelProvider> = match self.models {
            Some(models) => models,
            None => Arc::new(ConfiguredModelProvider::from_config(&config)?),
        };
        let history = self
            .history
            .unwrap_or_else(|| Arc::new(InMemoryChatHistory::new()));
        let tools = self.tools.unwrap_or_else(default_tools);

        let sessions = SessionCache::new(history.clone(), &config.session);
        let service = Arc::new(GenerationService::new(
            models.clone(),
            sessions,
            tools,
            &config.output_root,
        ));
        let facade = CodegenFacade::new(service.clone(), ArtifactPersister::new(&config.output_root));
        let classifier = Arc::new(PromptClassifier::new(models.clone()));
        let workflow = CodegenWorkflow::new(service, classifier.clone(), models.clone(), &config.workflow);

        tracing::debug!(output_root = %config.output_root.display(), "Sitegen client ready");

        Ok(SitegenClient {
            config,
            models,
            history,
            facade,
            classifier,
            workflow,
            sweeper: None,
        })
    }
}

#[cfg(feature = "default-tools")]
fn default_tools() -> Arc<dyn ToolSetFactory> {
    Arc::new(sitegen_tools::SandboxToolFactory)
}

#[cfg(not(feature = "default-tools"))]
fn default_tools() -> Arc<dyn ToolSetFactory> {
    tracing::warn!("Built without default-tools; project scaffolds run with no tools");
    Arc::new(|_: &Path| sitegen_core::tools::ToolSet::new())
}
