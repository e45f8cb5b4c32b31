//! Automated generation workflow
//!
//! A small state machine that classifies a prompt, generates code, gates it
//! on a model-graded quality check and builds project scaffolds.

mod engine;
mod events;
pub mod nodes;
mod state;

pub use engine::CodegenWorkflow;
pub use events::{STEP_COMPLETE, WORKFLOW_COMPLETE, WORKFLOW_ERROR, WORKFLOW_START, WorkflowEvent};
pub use state::{NodeName, StatePatch, WorkflowState};
