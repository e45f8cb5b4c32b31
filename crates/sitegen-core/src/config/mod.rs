//! Configuration for Sitegen
//!
//! Configuration is layered by [`ConfigLoader`]: built-in defaults, then an
//! optional file (TOML, YAML or JSON by extension), then environment
//! variables. Later sources override earlier ones field by field.

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod model;
pub mod timeouts;

pub use loader::{ConfigLoader, ConfigSource, load_config};
pub use model::{
    Config, LogFormat, LoggingConfig, ModelConfig, ModelsConfig, ProviderKind, SessionConfig,
    WorkflowConfig,
};
