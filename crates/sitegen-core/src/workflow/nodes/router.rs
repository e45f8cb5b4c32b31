use super::WorkflowNode;
use crate::error::{SitegenError, SitegenResult};
use crate::router::PromptClassifier;
use crate::workflow::state::{NodeName, StatePatch, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Picks the output type for the prompt
pub struct RouterNode {
    classifier: Arc<PromptClassifier>,
}

impl RouterNode {
    pub fn new(classifier: Arc<PromptClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl WorkflowNode for RouterNode {
    fn name(&self) -> NodeName {
        NodeName::Router
    }

    async fn run(&self, state: &WorkflowState, cancel: &CancellationToken) -> SitegenResult<StatePatch> {
        debug!("Executing router node");
        let output_type = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
            output_type = self.classifier.classify(state.effective_prompt()) => output_type,
        };
        Ok(StatePatch {
            output_type: Some(output_type),
            ..StatePatch::default()
        })
    }
}
