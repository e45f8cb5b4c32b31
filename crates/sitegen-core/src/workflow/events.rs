//! Progress events pushed by a streaming workflow run

use super::state::{NodeName, StatePatch, WorkflowState};
use serde::Serialize;
use serde_json::{Value, json};

pub const WORKFLOW_START: &str = "workflow-start";
pub const STEP_COMPLETE: &str = "step-complete";
pub const WORKFLOW_COMPLETE: &str = "workflow-complete";
pub const WORKFLOW_ERROR: &str = "workflow-error";

/// A named event with a JSON payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowEvent {
    pub event: String,
    pub data: Value,
}

impl WorkflowEvent {
    fn new(event: &str, data: Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    pub fn start(original_prompt: &str) -> Self {
        Self::new(
            WORKFLOW_START,
            json!({
                "message": "Codegen workflow: starting execution",
                "original_prompt": original_prompt,
            }),
        )
    }

    /// `state` holds only the fields the node set
    pub fn step_complete(step_number: u32, node: NodeName, patch: &StatePatch) -> Self {
        Self::new(
            STEP_COMPLETE,
            json!({
                "step_number": step_number,
                "current_step": node,
                "state": patch,
            }),
        )
    }

    pub fn complete(state: &WorkflowState) -> Self {
        Self::new(
            WORKFLOW_COMPLETE,
            json!({
                "message": "Codegen workflow completed",
                "state": state,
            }),
        )
    }

    pub fn error(error: impl std::fmt::Display) -> Self {
        Self::new(
            WORKFLOW_ERROR,
            json!({
                "error": error.to_string(),
                "message": "Codegen workflow: execution failed",
            }),
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.event == WORKFLOW_COMPLETE || self.event == WORKFLOW_ERROR
    }

    /// Render as a server-sent event frame
    pub fn to_sse(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }
}
