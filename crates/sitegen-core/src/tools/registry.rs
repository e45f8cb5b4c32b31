//! Tool sets bound to one agent round

use crate::tools::base::Tool;
use crate::tools::types::ToolSchema;
use std::path::Path;
use std::sync::Arc;

/// Ordered set of tools offered to the model for one working directory
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Create an empty tool set
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool; a later tool with the same name replaces the earlier one
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Schemas for all registered tools, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Names of all registered tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tool_names())
            .finish()
    }
}

/// Builds the tool set confined to a working directory
pub trait ToolSetFactory: Send + Sync {
    fn create(&self, work_dir: &Path) -> ToolSet;
}

impl<F> ToolSetFactory for F
where
    F: Fn(&Path) -> ToolSet + Send + Sync,
{
    fn create(&self, work_dir: &Path) -> ToolSet {
        self(work_dir)
    }
}
