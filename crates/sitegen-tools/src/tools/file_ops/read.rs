//! File reading

use crate::sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
use async_trait::async_trait;
use sitegen_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Returns a file's text
pub struct FileReadTool {
    sandbox: Sandbox,
}

impl FileReadTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "FileRead"
    }

    fn description(&self) -> &str {
        "Read content from a file at the specified path."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("filePath", "Relative file path to read")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("filePath")?;

        let output = match self.sandbox.resolve(&file_path) {
            None => PATH_TRAVERSAL_MESSAGE.to_string(),
            Some(path) if !path.exists() => format!("File not found: {}", file_path),
            Some(path) => match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => format!("Failed to read file: {}", e),
            },
        };

        Ok(ToolResult::success(&call.id, self.name(), output))
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        call.require_string("filePath").map(|_| ())
    }
}
