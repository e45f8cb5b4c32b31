//! Terminal tool ending an agent round

use async_trait::async_trait;
use sitegen_core::tools::{EXIT_TOOL_NAME, Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use tracing::info;

/// Signals that the agent has finished all tasks
#[derive(Debug, Default)]
pub struct ExitTool;

impl ExitTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ExitTool {
    fn name(&self) -> &str {
        EXIT_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Call this tool when you have completed **ALL** tasks, provide a summary of what was done."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("summary", "Summary of completed work")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let summary = call.require_string("summary")?;
        info!(summary = %summary, "Agent finished");
        Ok(ToolResult::success(&call.id, self.name(), summary))
    }

    fn is_terminal(&self) -> bool {
        true
    }
}
