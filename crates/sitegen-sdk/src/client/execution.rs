//! Generation, classification and workflow entry points

use crate::client::SitegenClient;
use futures::Stream;
use sitegen_core::{
    codegen::{GenerationEvent, GenerationOutcome},
    error::SitegenResult,
    session::ChatHistoryRecord,
    types::OutputType,
    workflow::{WorkflowEvent, WorkflowState},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

impl SitegenClient {
    /// Generate code for a target in conversation and record the exchange.
    ///
    /// Rejected input is returned before anything is loaded or recorded.
    /// Otherwise the user message is appended to the target's chat history
    /// before generation starts. When generation succeeds and produced output,
    /// the concatenated response is appended as the assistant turn. Generation
    /// failures are returned as-is; the user turn stays recorded.
    #[instrument(skip(self, message, on_event, cancel), fields(output_type = %output_type))]
    pub async fn chat_to_codegen(
        &self,
        target_id: &str,
        message: &str,
        output_type: OutputType,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<GenerationOutcome> {
        self.facade
            .guardrail()
            .validate(message)
            .inspect_err(|e| error!(error = %e, "Input rejected"))?;

        // Hydrate a cold session first so it does not load this turn as history.
        drop(self.sessions().get(output_type, target_id).await?);
        self.history
            .append(target_id, ChatHistoryRecord::user(message))
            .await?;

        let outcome = self
            .facade
            .generate_and_save(target_id, message, output_type, on_event, cancel)
            .await
            .inspect_err(|e| error!(error = %e, "Code generation error"))?;

        if !outcome.content.is_empty() {
            self.history
                .append(target_id, ChatHistoryRecord::ai(outcome.content.clone()))
                .await?;
        }

        info!(
            chars = outcome.content.len(),
            output_dir = ?outcome.output_dir,
            "Chat to codegen completed"
        );
        Ok(outcome)
    }

    /// Pick the output type for a request, defaulting to a single file
    pub async fn classify(&self, prompt: &str) -> OutputType {
        self.classifier.classify(prompt).await
    }

    /// Run the automated workflow to completion
    ///
    /// With a `target_id` the generated code shares that target's
    /// conversation session and output directory.
    pub async fn run_workflow(
        &self,
        prompt: &str,
        target_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> SitegenResult<WorkflowState> {
        self.workflow.execute_state(initial_state(prompt, target_id), cancel).await
    }

    /// Run the automated workflow, yielding progress events
    pub fn workflow_stream(
        &self,
        prompt: &str,
        target_id: Option<&str>,
        cancel: CancellationToken,
    ) -> impl Stream<Item = WorkflowEvent> + Send + 'static {
        self.workflow.execute_stream(initial_state(prompt, target_id), cancel)
    }
}

fn initial_state(prompt: &str, target_id: Option<&str>) -> WorkflowState {
    let state = WorkflowState::new(prompt);
    match target_id {
        Some(target_id) => state.with_target_id(target_id),
        None => state,
    }
}
