//! File deletion with protected project files

use crate::sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
use async_trait::async_trait;
use sitegen_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use std::path::Path;
use tracing::info;

/// File names the agent may never delete, wherever they live
pub const PROTECTED_FILES: &[&str] = &[
    "package.json",
    "vite.config.ts",
    "vite.config.js",
    "index.html",
    "tsconfig.json",
    "tsconfig.node.json",
];

/// Removes a single file
pub struct FileDeleteTool {
    sandbox: Sandbox,
}

impl FileDeleteTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileDeleteTool {
    fn name(&self) -> &str {
        "FileDelete"
    }

    fn description(&self) -> &str {
        "Delete a file at the specified path, some critical files are protected."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("filePath", "Relative file path to delete")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("filePath")?;
        let file_name = Path::new(&file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let output = match self.sandbox.resolve(&file_path) {
            None => PATH_TRAVERSAL_MESSAGE.to_string(),
            Some(_) if PROTECTED_FILES.contains(&file_name.as_str()) => {
                format!("Cannot delete protected file: {}", file_name)
            }
            Some(path) if !path.exists() => format!("File not found: {}", file_path),
            Some(path) => match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    info!(path = %file_path, "File deleted");
                    format!("File deleted: {}", file_path)
                }
                Err(e) => format!("Failed to delete file: {}", e),
            },
        };

        Ok(ToolResult::success(&call.id, self.name(), output))
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        call.require_string("filePath").map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn call(file_path: &str) -> ToolCall {
        ToolCall::from_json("c1", "FileDelete", json!({"filePath": file_path}))
    }

    #[tokio::test]
    async fn test_deletes_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        std::fs::write(temp_dir.path().join("src/old.ts"), "").unwrap();
        let tool = FileDeleteTool::new(Sandbox::new(temp_dir.path()));

        let result = tool.execute(&call("src/old.ts")).await.unwrap();
        assert_eq!(result.content(), "File deleted: src/old.ts");
        assert!(!temp_dir.path().join("src/old.ts").exists());

        let result = tool.execute(&call("src/old.ts")).await.unwrap();
        assert_eq!(result.content(), "File not found: src/old.ts");
    }

    #[tokio::test]
    async fn test_protected_files_survive() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested/package.json"), "{}").unwrap();
        let tool = FileDeleteTool::new(Sandbox::new(temp_dir.path()));

        let result = tool.execute(&call("nested/package.json")).await.unwrap();
        assert_eq!(result.content(), "Cannot delete protected file: package.json");
        assert!(temp_dir.path().join("nested/package.json").exists());
    }
}
