use super::WorkflowNode;
use crate::codegen::GenerationService;
use crate::error::SitegenResult;
use crate::workflow::state::{NodeName, StatePatch, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Generates code as plain text, without binding tools
pub struct CodegenNode {
    service: Arc<GenerationService>,
}

impl CodegenNode {
    pub fn new(service: Arc<GenerationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl WorkflowNode for CodegenNode {
    fn name(&self) -> NodeName {
        NodeName::Codegen
    }

    async fn run(&self, state: &WorkflowState, cancel: &CancellationToken) -> SitegenResult<StatePatch> {
        let output_type = state.output_type.unwrap_or_default();
        debug!(output_type = %output_type, attempt = state.retry_count + 1, "Executing codegen node");

        let code = self
            .service
            .generate_text(state.effective_target_id(), state.effective_prompt(), output_type, cancel)
            .await?;

        info!(chars = code.len(), "Workflow code generated");
        Ok(StatePatch {
            generated_code: Some(code),
            ..StatePatch::default()
        })
    }
}
