//! SDK client implementation

use sitegen_core::{
    codegen::CodegenFacade,
    config::Config,
    llm::ModelProvider,
    router::PromptClassifier,
    session::{ChatHistoryProvider, SessionCache, SweeperHandle},
    workflow::CodegenWorkflow,
};
use std::path::Path;
use std::sync::Arc;

mod builder;
mod execution;

pub use builder::SitegenClientBuilder;

/// High-level client for the Sitegen engine.
///
/// `SitegenClient` owns one fully wired engine: the model provider, the
/// session cache hydrated from a chat history store, the guarded
/// generate-and-save facade, the output-type classifier and the automated
/// workflow. It is cheap to share behind an `Arc`; every method takes
/// `&self`.
///
/// # Examples
///
/// ```no_run
/// use sitegen_sdk::SitegenClient;
///
/// # async fn example() -> Result<(), sitegen_sdk::SitegenError> {
/// let client = SitegenClient::with_config_file("sitegen.toml")?;
/// let output_type = client.classify("A kanban board with drag and drop").await;
/// println!("routed to {}", output_type);
/// # Ok(())
/// # }
/// ```
///
/// # Builder Pattern
///
/// Collaborators can be replaced before the engine is assembled:
///
/// ```no_run
/// use sitegen_sdk::{Config, SitegenClient};
///
/// # fn example() -> Result<(), sitegen_sdk::SitegenError> {
/// let client = SitegenClient::builder(Config::default())
///     .with_history_dir("data/history")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SitegenClient {
    pub(crate) config: Config,
    pub(crate) models: Arc<dyn ModelProvider>,
    pub(crate) history: Arc<dyn ChatHistoryProvider>,
    pub(crate) facade: CodegenFacade,
    pub(crate) classifier: Arc<PromptClassifier>,
    pub(crate) workflow: CodegenWorkflow,
    pub(crate) sweeper: Option<SweeperHandle>,
}

impl SitegenClient {
    /// Get the configuration the engine was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn models(&self) -> &Arc<dyn ModelProvider> {
        &self.models
    }

    pub fn history(&self) -> &Arc<dyn ChatHistoryProvider> {
        &self.history
    }

    pub fn facade(&self) -> &CodegenFacade {
        &self.facade
    }

    pub fn workflow(&self) -> &CodegenWorkflow {
        &self.workflow
    }

    /// Live conversation sessions
    pub fn sessions(&self) -> &SessionCache {
        self.facade.service().sessions()
    }

    /// Root under which generated artifacts are written
    pub fn output_root(&self) -> &Path {
        self.facade.service().output_root()
    }

    /// Start evicting idle sessions every `session.sweep_interval`
    ///
    /// Must be called from within a Tokio runtime. Calling it again restarts
    /// the sweeper; it stops when the client is dropped.
    pub fn start_session_sweeper(&mut self) {
        let interval = self.config.session.sweep_interval;
        self.sweeper = Some(self.sessions().start_sweeper(interval));
        tracing::debug!(?interval, "Session sweeper started");
    }

    /// Stop the idle-session sweeper, if running
    pub fn stop_session_sweeper(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.stop();
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|h| !h.is_stopped())
    }
}

#[cfg(test)]
mod tests;
