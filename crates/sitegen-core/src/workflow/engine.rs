//! Workflow graph execution

use super::events::WorkflowEvent;
use super::nodes::{
    CodegenNode, ProjectBuildNode, PromptEnhanceNode, QualityCheckNode, RouterNode, WorkflowNode,
};
use super::state::{NodeName, StatePatch, WorkflowState};
use crate::codegen::GenerationService;
use crate::config::WorkflowConfig;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::ModelProvider;
use crate::router::PromptClassifier;
use futures::Stream;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Non-interactive generation pipeline
///
/// `promptEnhance → router → codegen → codeQualityCheck`, then back to
/// `codegen` on a failed check, on to `projectBuild` for project scaffolds,
/// or to the end. Failed checks are retried at most `max_quality_retries`
/// times; after that the run ends with the failure recorded in
/// [`WorkflowState::error`].
#[derive(Clone)]
pub struct CodegenWorkflow {
    prompt_enhance: Arc<PromptEnhanceNode>,
    router: Arc<RouterNode>,
    codegen: Arc<CodegenNode>,
    quality_check: Arc<QualityCheckNode>,
    project_build: Arc<ProjectBuildNode>,
    max_quality_retries: u32,
}

impl CodegenWorkflow {
    pub fn new(
        service: Arc<GenerationService>,
        classifier: Arc<PromptClassifier>,
        models: Arc<dyn ModelProvider>,
        config: &WorkflowConfig,
    ) -> Self {
        let output_root = service.output_root().to_path_buf();
        Self {
            prompt_enhance: Arc::new(PromptEnhanceNode),
            router: Arc::new(RouterNode::new(classifier)),
            codegen: Arc::new(CodegenNode::new(service)),
            quality_check: Arc::new(QualityCheckNode::new(models, config.pass_score)),
            project_build: Arc::new(ProjectBuildNode::new(output_root, config)),
            max_quality_retries: config.max_quality_retries,
        }
    }

    /// Run the graph to the end and return the final state
    pub async fn execute(&self, user_prompt: &str, cancel: &CancellationToken) -> SitegenResult<WorkflowState> {
        self.execute_state(WorkflowState::new(user_prompt), cancel).await
    }

    /// Run the graph from a prepared initial state
    pub async fn execute_state(
        &self,
        initial: WorkflowState,
        cancel: &CancellationToken,
    ) -> SitegenResult<WorkflowState> {
        self.run(initial, cancel, &mut |_, _, _| {}).await
    }

    /// Run the graph on a background task, yielding progress events
    ///
    /// The stream starts with `workflow-start`, carries one `step-complete`
    /// per executed node with that node's patch and ends with
    /// `workflow-complete` or `workflow-error`. Dropping the stream stops the
    /// run, aborting any in-flight node.
    pub fn execute_stream(
        &self,
        initial: WorkflowState,
        cancel: CancellationToken,
    ) -> impl Stream<Item = WorkflowEvent> + Send + 'static {
        let (tx, rx) = mpsc::unbounded_channel();
        let workflow = self.clone();

        tokio::spawn(async move {
            let _ = tx.send(WorkflowEvent::start(&initial.user_prompt));

            let mut on_step = |step: u32, node: NodeName, patch: &StatePatch| {
                let _ = tx.send(WorkflowEvent::step_complete(step, node, patch));
            };
            let terminal = tokio::select! {
                result = workflow.run(initial, &cancel, &mut on_step) => match result {
                    Ok(state) => WorkflowEvent::complete(&state),
                    Err(e) => WorkflowEvent::error(e),
                },
                _ = tx.closed() => {
                    warn!("Workflow stream dropped, stopping run");
                    return;
                }
            };
            let _ = tx.send(terminal);
        });

        UnboundedReceiverStream::new(rx)
    }

    fn node(&self, name: NodeName) -> &dyn WorkflowNode {
        match name {
            NodeName::PromptEnhance => self.prompt_enhance.as_ref(),
            NodeName::Router => self.router.as_ref(),
            NodeName::Codegen => self.codegen.as_ref(),
            NodeName::CodeQualityCheck => self.quality_check.as_ref(),
            NodeName::ProjectBuild => self.project_build.as_ref(),
        }
    }

    #[instrument(skip_all)]
    async fn run(
        &self,
        mut state: WorkflowState,
        cancel: &CancellationToken,
        on_step: &mut (dyn FnMut(u32, NodeName, &StatePatch) + Send),
    ) -> SitegenResult<WorkflowState> {
        let mut current = Some(NodeName::PromptEnhance);
        let mut step = 0u32;

        while let Some(name) = current {
            if cancel.is_cancelled() {
                return Err(SitegenError::Cancelled);
            }

            let patch = self.node(name).run(&state, cancel).await.map_err(|e| {
                error!(node = %name, error = %e, "Codegen workflow: execution failed");
                e
            })?;
            step += 1;
            info!(step, node = %name, "Codegen workflow: step completed");
            on_step(step, name, &patch);
            state.merge(patch);

            current = self.next(name, &mut state);
        }

        info!(retries = state.retry_count, "Codegen workflow: execution completed");
        Ok(state)
    }

    fn next(&self, after: NodeName, state: &mut WorkflowState) -> Option<NodeName> {
        match after {
            NodeName::PromptEnhance => Some(NodeName::Router),
            NodeName::Router => Some(NodeName::Codegen),
            NodeName::Codegen => Some(NodeName::CodeQualityCheck),
            NodeName::CodeQualityCheck if !state.quality_check_passed => {
                if state.retry_count >= self.max_quality_retries {
                    let attempts = state.retry_count + 1;
                    warn!(attempts, "Quality check retries exhausted");
                    state.error = Some(format!("Quality check failed after {} attempts", attempts));
                    None
                } else {
                    state.retry_count += 1;
                    Some(NodeName::Codegen)
                }
            }
            NodeName::CodeQualityCheck => state
                .output_type
                .filter(|t| t.policy().requires_build)
                .map(|_| NodeName::ProjectBuild),
            NodeName::ProjectBuild => None,
        }
    }
}
