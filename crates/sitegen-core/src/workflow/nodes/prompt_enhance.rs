use super::WorkflowNode;
use crate::error::SitegenResult;
use crate::workflow::state::{NodeName, StatePatch, WorkflowState};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Copies the user prompt through unchanged
#[derive(Debug, Default)]
pub struct PromptEnhanceNode;

#[async_trait]
impl WorkflowNode for PromptEnhanceNode {
    fn name(&self) -> NodeName {
        NodeName::PromptEnhance
    }

    async fn run(&self, state: &WorkflowState, _cancel: &CancellationToken) -> SitegenResult<StatePatch> {
        debug!("Executing prompt enhance node");
        Ok(StatePatch {
            enhanced_prompt: Some(state.user_prompt.clone()),
            ..StatePatch::default()
        })
    }
}
