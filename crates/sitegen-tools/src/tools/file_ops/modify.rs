//! Search-and-replace file edits

use crate::sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
use async_trait::async_trait;
use sitegen_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use std::path::Path;

/// Replaces the first occurrence of a string in a file
pub struct FileModifyTool {
    sandbox: Sandbox,
}

impl FileModifyTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    async fn modify(&self, path: &Path, file_path: &str, search: &str, replace: &str) -> std::io::Result<String> {
        let content = tokio::fs::read_to_string(path).await?;
        if !content.contains(search) {
            return Ok(format!("Search string not found in file: {}", file_path));
        }
        tokio::fs::write(path, content.replacen(search, replace, 1)).await?;
        Ok(format!("File modified: {}", file_path))
    }
}

#[async_trait]
impl Tool for FileModifyTool {
    fn name(&self) -> &str {
        "FileModify"
    }

    fn description(&self) -> &str {
        "Modify a file by replacing a search string with a replacement string."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("filePath", "Relative file path"),
                ToolParameter::string("searchStr", "String to search for"),
                ToolParameter::string("replaceStr", "String to replace with"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("filePath")?;
        let search = call.require_string("searchStr")?;
        let replace = call.require_string("replaceStr")?;

        let output = match self.sandbox.resolve(&file_path) {
            None => PATH_TRAVERSAL_MESSAGE.to_string(),
            Some(path) if !path.exists() => format!("File not found: {}", file_path),
            Some(path) => self
                .modify(&path, &file_path, &search, &replace)
                .await
                .unwrap_or_else(|e| format!("Failed to modify file: {}", e)),
        };

        Ok(ToolResult::success(&call.id, self.name(), output))
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        for key in ["filePath", "searchStr", "replaceStr"] {
            call.require_string(key)?;
        }
        Ok(())
    }
}
