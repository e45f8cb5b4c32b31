//! Tool system for Sitegen
//!
//! Tools are the actions the project-scaffold agent can request. The trait
//! and wire types live here; the sandboxed implementations live in the
//! `sitegen-tools` crate and are injected through [`ToolSetFactory`].

pub mod base;
pub mod registry;
pub mod types;

pub use base::{Tool, ToolError};
pub use registry::{ToolSet, ToolSetFactory};
pub use types::{ToolCall, ToolParameter, ToolResult, ToolSchema};

/// Name of the terminal tool that ends an agent round
pub const EXIT_TOOL_NAME: &str = "Exit";
