//! Model selection by role

use crate::config::{Config, ProviderKind};
use crate::error::SitegenResult;
use crate::llm::client::{ChatModel, OpenAiCompatibleClient};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which configured model a caller needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// Streaming generation and the quality check
    Standard,
    /// Tool-using project-scaffold agent
    Reasoning,
    /// Short classification calls
    Route,
}

impl ModelRole {
    pub const ALL: [ModelRole; 3] = [ModelRole::Standard, ModelRole::Reasoning, ModelRole::Route];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Standard => "standard",
            ModelRole::Reasoning => "reasoning",
            ModelRole::Route => "route",
        }
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of chat models for the engine's components
pub trait ModelProvider: Send + Sync {
    fn model(&self, role: ModelRole) -> SitegenResult<Arc<dyn ChatModel>>;
}

/// Provider built from [`Config`], one HTTP client per role
pub struct ConfiguredModelProvider {
    provider: ProviderKind,
    models: HashMap<ModelRole, Arc<dyn ChatModel>>,
}

impl ConfiguredModelProvider {
    pub fn from_config(config: &Config) -> SitegenResult<Self> {
        let mut models: HashMap<ModelRole, Arc<dyn ChatModel>> = HashMap::new();
        for role in ModelRole::ALL {
            let client = OpenAiCompatibleClient::new(
                config.models.for_role(role).clone(),
                config.request_timeout,
            )?;
            models.insert(role, Arc::new(client));
        }

        tracing::info!(
            provider = ?config.provider,
            standard = %config.models.standard.model,
            reasoning = %config.models.reasoning.model,
            route = %config.models.route.model,
            "Chat models configured"
        );

        Ok(Self {
            provider: config.provider,
            models,
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }
}

impl ModelProvider for ConfiguredModelProvider {
    fn model(&self, role: ModelRole) -> SitegenResult<Arc<dyn ChatModel>> {
        self.models.get(&role).cloned().ok_or_else(|| {
            crate::error::SitegenError::config(format!("No model configured for role {}", role))
        })
    }
}

/// Serve the same model for every role
///
/// Useful for tests and for single-model deployments.
pub struct SingleModelProvider(pub Arc<dyn ChatModel>);

impl ModelProvider for SingleModelProvider {
    fn model(&self, _role: ModelRole) -> SitegenResult<Arc<dyn ChatModel>> {
        Ok(self.0.clone())
    }
}
