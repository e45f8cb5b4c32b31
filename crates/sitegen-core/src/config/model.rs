//! Configuration model

use crate::config::timeouts;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::ModelRole;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which backend serves the chat models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Any OpenAI-compatible cloud endpoint
    #[default]
    #[serde(alias = "openai")]
    Cloud,
    /// A local Ollama server, through its OpenAI-compatible API
    Ollama,
}

/// Connection and sampling parameters for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API base URL, up to and including the version segment
    pub base_url: String,
    /// API key; omitted from requests when unset
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(8192),
            temperature: None,
        }
    }
}

/// The three model variants the engine uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Plain streaming generation and the quality check
    pub standard: ModelConfig,
    /// Project-scaffold agent
    pub reasoning: ModelConfig,
    /// Output-type classification
    pub route: ModelConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            standard: ModelConfig::default(),
            reasoning: ModelConfig {
                model: "gpt-4.1".to_string(),
                temperature: Some(0.1),
                ..ModelConfig::default()
            },
            route: ModelConfig {
                max_tokens: Some(100),
                ..ModelConfig::default()
            },
        }
    }
}

impl ModelsConfig {
    pub fn for_role(&self, role: ModelRole) -> &ModelConfig {
        match role {
            ModelRole::Standard => &self.standard,
            ModelRole::Reasoning => &self.reasoning,
            ModelRole::Route => &self.route,
        }
    }

    pub fn for_role_mut(&mut self, role: ModelRole) -> &mut ModelConfig {
        match role {
            ModelRole::Standard => &mut self.standard,
            ModelRole::Reasoning => &mut self.reasoning,
            ModelRole::Route => &mut self.route,
        }
    }
}

/// Conversation session cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Messages kept per session
    pub max_messages: usize,
    /// Idle time before a session is evicted
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Interval between eviction sweeps
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_messages: 20,
            ttl: timeouts::session::ttl(),
            sweep_interval: timeouts::session::sweep_interval(),
        }
    }
}

/// Automated pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Quality-check failures tolerated before the graph gives up
    pub max_quality_retries: u32,
    /// Minimum score for a passing verdict
    pub pass_score: f64,
    /// Timeout applied to each build command
    #[serde(with = "humantime_serde")]
    pub build_timeout: Duration,
    /// Dependency installation command, program first
    pub install_command: Vec<String>,
    /// Build command, program first
    pub build_command: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_quality_retries: 3,
            pass_score: 60.0,
            build_timeout: timeouts::build::command_timeout(),
            install_command: vec!["npm".to_string(), "install".to_string()],
            build_command: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub models: ModelsConfig,
    /// Root under which `<output_type>_<target_id>` directories are created
    pub output_root: PathBuf,
    /// Whole-request timeout for model calls
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub session: SessionConfig,
    pub workflow: WorkflowConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Cloud,
            models: ModelsConfig::default(),
            output_root: PathBuf::from("tmp").join("code_output"),
            request_timeout: timeouts::llm::request_timeout(),
            session: SessionConfig::default(),
            workflow: WorkflowConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Check invariants the engine relies on
    pub fn validate(&self) -> SitegenResult<()> {
        for role in [ModelRole::Standard, ModelRole::Reasoning, ModelRole::Route] {
            let model = self.models.for_role(role);
            if model.model.trim().is_empty() {
                return Err(SitegenError::config_with_context(
                    "Model name cannot be empty",
                    format!("models.{}", role),
                ));
            }
            if model.base_url.trim().is_empty() {
                return Err(SitegenError::config_with_context(
                    "Base URL cannot be empty",
                    format!("models.{}", role),
                ));
            }
        }

        if self.session.max_messages == 0 {
            return Err(SitegenError::config("session.max_messages must be positive"));
        }

        if !(0.0..=100.0).contains(&self.workflow.pass_score) {
            return Err(SitegenError::config(
                "workflow.pass_score must be between 0 and 100",
            ));
        }

        if self.workflow.install_command.is_empty() || self.workflow.build_command.is_empty() {
            return Err(SitegenError::config("Build commands cannot be empty"));
        }

        Ok(())
    }
}
