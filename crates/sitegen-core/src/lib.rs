//! Sitegen Core Library
//!
//! This crate provides the conversational code-generation engine: input
//! guardrail, per-target conversation sessions, streaming generation with a
//! tool-calling agent for project scaffolds, artifact extraction and
//! persistence, output-type routing and the automated quality-gated workflow.

pub mod codegen;
pub mod config;
pub mod error;
pub mod guardrail;
pub mod llm;
pub mod prompts;
pub mod router;
pub mod session;
pub mod tools;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use codegen::{
    ArtifactPersister, CodeExtractor, CodegenFacade, GenerationEvent, GenerationOutcome,
    GenerationService, ParsedArtifact,
};
pub use config::{Config, ConfigLoader, load_config};
pub use error::{SitegenError, SitegenResult};
pub use guardrail::PromptGuardrail;
pub use llm::{ChatModel, ConfiguredModelProvider, LlmMessage, ModelProvider, ModelRole};
pub use router::PromptClassifier;
pub use session::{ChatHistoryProvider, ChatHistoryRecord, SessionCache};
pub use tools::{Tool, ToolCall, ToolError, ToolResult, ToolSchema, ToolSet, ToolSetFactory};
pub use types::{OutputPolicy, OutputType};
pub use workflow::{CodegenWorkflow, WorkflowEvent, WorkflowState};
