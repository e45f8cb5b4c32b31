//! File writing

use crate::sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
use async_trait::async_trait;
use sitegen_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use std::path::Path;
use tracing::{debug, error};

/// Creates or overwrites a file, creating parent directories
pub struct FileWriteTool {
    sandbox: Sandbox,
}

impl FileWriteTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

async fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        "FileWrite"
    }

    fn description(&self) -> &str {
        "Write content to a file at the specified path, creates necessary directories."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("filepath", "Relative file path"),
                ToolParameter::string("content", "File content to write"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("filepath")?;
        let content = call.require_string("content")?;

        let Some(path) = self.sandbox.resolve(&file_path) else {
            return Ok(ToolResult::success(&call.id, self.name(), PATH_TRAVERSAL_MESSAGE));
        };

        let output = match write_file(&path, &content).await {
            Ok(()) => {
                debug!(path = %file_path, bytes = content.len(), "File written");
                format!("File written: {}", file_path)
            }
            Err(e) => {
                error!(path = %file_path, error = %e, "Failed to write file");
                format!("Failed to write file: {}", e)
            }
        };

        Ok(ToolResult::success(&call.id, self.name(), output))
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        call.require_string("filepath")?;
        call.require_string("content").map(|_| ())
    }
}
