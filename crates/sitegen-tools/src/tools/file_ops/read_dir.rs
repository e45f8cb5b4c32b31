//! Recursive directory listing

use crate::sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
use async_trait::async_trait;
use sitegen_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use std::io;
use std::path::{Path, PathBuf};

/// Levels listed below the requested directory
const MAX_DEPTH: usize = 5;

/// Build output and dependency folders never shown to the model
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    ".next",
    ".nuxt",
    "build",
    ".cache",
    "coverage",
];

/// Lists the project tree as indented text
pub struct ReadDirTool {
    sandbox: Sandbox,
}

impl ReadDirTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ReadDirTool {
    fn name(&self) -> &str {
        "ReadDir"
    }

    fn description(&self) -> &str {
        "Read the directory structure recursively."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::optional_string(
                "dirPath",
                "Relative directory path (default: root)",
            )],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let dir_path = call.get_string("dirPath").filter(|p| !p.is_empty());
        let shown = dir_path.as_deref().unwrap_or(".");

        let output = match self.sandbox.resolve(dir_path.as_deref().unwrap_or("")) {
            None => PATH_TRAVERSAL_MESSAGE.to_string(),
            Some(target) if !target.exists() => format!("Directory not found: {}", shown),
            Some(target) => {
                let listing = tokio::task::spawn_blocking(move || build_tree(&target, "", 0))
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                listing.unwrap_or_else(|e| format!("Failed to read directory: {}", e))
            }
        };

        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}

fn build_tree(dir: &Path, prefix: &str, depth: usize) -> io::Result<String> {
    if depth >= MAX_DEPTH {
        return Ok(String::new());
    }

    let mut entries: Vec<(String, PathBuf, bool)> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (name, entry.path(), is_dir)
        })
        .filter(|(name, _, _)| !name.starts_with('.') && !IGNORED_DIRS.contains(&name.as_str()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut tree = String::new();
    for (name, path, is_dir) in entries {
        tree.push_str(prefix);
        tree.push_str(&name);
        if is_dir {
            tree.push('/');
        }
        tree.push('\n');

        if is_dir {
            tree.push_str(&build_tree(&path, &format!("{}  ", prefix), depth + 1)?);
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn tool(root: &Path) -> ReadDirTool {
        ReadDirTool::new(Sandbox::new(root))
    }

    #[tokio::test]
    async fn test_lists_tree_with_indent_and_ignores() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("src/components")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/vue")).unwrap();
        std::fs::write(root.join("package.json"), "{}").unwrap();
        std::fs::write(root.join(".env"), "KEY=1").unwrap();
        std::fs::write(root.join("src/main.ts"), "").unwrap();
        std::fs::write(root.join("src/components/App.vue"), "").unwrap();

        let call = ToolCall::from_json("c1", "ReadDir", json!({}));
        let result = tool(root).execute(&call).await.unwrap();

        assert_eq!(
            result.content(),
            "package.json\nsrc/\n  components/\n    App.vue\n  main.ts\n"
        );
    }

    #[tokio::test]
    async fn test_depth_is_capped() {
        let temp_dir = TempDir::new().unwrap();
        let deep = temp_dir.path().join("a/b/c/d/e/f");
        std::fs::create_dir_all(&deep).unwrap();

        let call = ToolCall::from_json("c1", "ReadDir", json!({}));
        let result = tool(temp_dir.path()).execute(&call).await.unwrap();

        assert!(result.content().contains("        e/\n"));
        assert!(!result.content().contains("f/"));
    }

    #[tokio::test]
    async fn test_missing_and_escaping_directories() {
        let temp_dir = TempDir::new().unwrap();
        let tool = tool(temp_dir.path());

        let call = ToolCall::from_json("c1", "ReadDir", json!({"dirPath": "src"}));
        assert_eq!(tool.execute(&call).await.unwrap().content(), "Directory not found: src");

        let call = ToolCall::from_json("c2", "ReadDir", json!({"dirPath": "../.."}));
        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.content(), PATH_TRAVERSAL_MESSAGE);
    }
}
