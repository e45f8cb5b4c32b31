//! Tool implementations for the Sitegen project-scaffold agent
//!
//! Every file tool is bound to one working directory through a [`Sandbox`];
//! paths that resolve outside it are answered with
//! [`PATH_TRAVERSAL_MESSAGE`] instead of touching the filesystem.

pub mod sandbox;
pub mod tools;

pub use sandbox::{PATH_TRAVERSAL_MESSAGE, Sandbox};
pub use tools::{ExitTool, FileDeleteTool, FileModifyTool, FileReadTool, FileWriteTool, ReadDirTool};

use sitegen_core::tools::{ToolSet, ToolSetFactory};
use std::path::Path;
use std::sync::Arc;

/// Get the scaffold tool set for a working directory
pub fn create_sandbox_tools(work_dir: &Path) -> ToolSet {
    let sandbox = Sandbox::new(work_dir);
    ToolSet::new()
        .with_tool(Arc::new(FileWriteTool::new(sandbox.clone())))
        .with_tool(Arc::new(FileReadTool::new(sandbox.clone())))
        .with_tool(Arc::new(FileModifyTool::new(sandbox.clone())))
        .with_tool(Arc::new(FileDeleteTool::new(sandbox.clone())))
        .with_tool(Arc::new(ReadDirTool::new(sandbox)))
        .with_tool(Arc::new(ExitTool::new()))
}

/// [`ToolSetFactory`] producing [`create_sandbox_tools`] per working directory
#[derive(Debug, Default, Clone, Copy)]
pub struct SandboxToolFactory;

impl ToolSetFactory for SandboxToolFactory {
    fn create(&self, work_dir: &Path) -> ToolSet {
        create_sandbox_tools(work_dir)
    }
}
