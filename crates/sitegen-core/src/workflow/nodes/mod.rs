//! Workflow graph nodes
//!
//! Each node reads the current [`WorkflowState`] and returns a [`StatePatch`]
//! with only the fields it owns. Transitions live in the engine.

mod codegen;
mod project_build;
mod prompt_enhance;
mod quality_check;
mod router;

pub use codegen::CodegenNode;
pub use project_build::ProjectBuildNode;
pub use prompt_enhance::PromptEnhanceNode;
pub use quality_check::{QualityCheckNode, QualityVerdict, extract_json_object};
pub use router::RouterNode;

use super::state::{NodeName, StatePatch, WorkflowState};
use crate::error::SitegenResult;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// One step of the workflow graph
#[async_trait]
pub trait WorkflowNode: Send + Sync {
    fn name(&self) -> NodeName;

    async fn run(&self, state: &WorkflowState, cancel: &CancellationToken) -> SitegenResult<StatePatch>;
}
