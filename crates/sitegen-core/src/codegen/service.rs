//! Streaming generation service

use super::agent::AgentRound;
use super::events::GenerationEvent;
use super::persister::target_dir;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::{ChatModel, LlmMessage, ModelProvider};
use crate::session::SessionCache;
use crate::tools::ToolSetFactory;
use crate::types::OutputType;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Generates responses for a conversation session
///
/// The prompt is the output type's system prompt, the session history and the
/// new instruction. Project scaffolds run an [`AgentRound`] with the sandboxed
/// tool set for `<output_root>/vite_project_<target_id>`; other types stream
/// plain text. The instruction is appended to the session afterwards, whether
/// or not generation succeeded.
pub struct GenerationService {
    models: Arc<dyn ModelProvider>,
    sessions: SessionCache,
    tools: Arc<dyn ToolSetFactory>,
    output_root: PathBuf,
}

impl GenerationService {
    pub fn new(
        models: Arc<dyn ModelProvider>,
        sessions: SessionCache,
        tools: Arc<dyn ToolSetFactory>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            models,
            sessions,
            tools,
            output_root: output_root.into(),
        }
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Working directory of the scaffold agent for a target
    pub fn work_dir(&self, target_id: &str) -> SitegenResult<PathBuf> {
        target_dir(&self.output_root, OutputType::ProjectScaffold, target_id)
    }

    /// Generate a response, relaying every event to `on_event` as it happens
    #[instrument(skip(self, message, on_event, cancel), fields(output_type = %output_type))]
    pub async fn generate(
        &self,
        target_id: &str,
        message: &str,
        output_type: OutputType,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<()> {
        self.generate_inner(target_id, message, output_type, true, on_event, cancel)
            .await
    }

    /// Generate and collect a text response without binding tools
    ///
    /// Used by the automated workflow, which validates text output.
    #[instrument(skip(self, message, cancel), fields(output_type = %output_type))]
    pub async fn generate_text(
        &self,
        target_id: &str,
        message: &str,
        output_type: OutputType,
        cancel: &CancellationToken,
    ) -> SitegenResult<String> {
        let mut content = String::new();
        let mut collect = |event: GenerationEvent| {
            if let GenerationEvent::Text(text) = event {
                content.push_str(&text);
            }
        };
        self.generate_inner(target_id, message, output_type, false, &mut collect, cancel)
            .await?;
        Ok(content)
    }

    async fn generate_inner(
        &self,
        target_id: &str,
        message: &str,
        output_type: OutputType,
        allow_tools: bool,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<()> {
        let policy = output_type.policy();
        let model = self.models.model(policy.model_role)?;
        let mut session = self.sessions.get(output_type, target_id).await?;

        let mut messages = Vec::with_capacity(session.len() + 2);
        messages.push(LlmMessage::system(policy.system_prompt));
        messages.extend(session.messages().iter().cloned());
        messages.push(LlmMessage::user(message));

        info!(
            target_id,
            model = model.model_name(),
            history = session.len(),
            agent = policy.agent_mode && allow_tools,
            "Starting generation"
        );

        let result = if policy.agent_mode && allow_tools {
            self.run_agent(model, messages, target_id, on_event, cancel)
                .await
        } else {
            stream_plain(model.as_ref(), &messages, on_event, cancel).await
        };

        session.append_user(message);

        match &result {
            Ok(()) => debug!(target_id, "Generation finished"),
            Err(e) => error!(target_id, error = %e, "Generation failed"),
        }
        result
    }

    async fn run_agent(
        &self,
        model: Arc<dyn ChatModel>,
        messages: Vec<LlmMessage>,
        target_id: &str,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<()> {
        let work_dir = self.work_dir(target_id)?;
        tokio::fs::create_dir_all(&work_dir).await.map_err(|e| {
            SitegenError::io_with_path(
                format!("Failed to create working directory: {}", e),
                work_dir.display().to_string(),
            )
        })?;

        let tools = self.tools.create(&work_dir);
        let outcome = AgentRound::new(model, tools)
            .run(messages, on_event, cancel)
            .await?;

        info!(
            target_id,
            tool_calls = outcome.tool_calls.len(),
            exited = outcome.exited,
            "Agent round finished"
        );
        Ok(())
    }
}

async fn stream_plain(
    model: &dyn ChatModel,
    messages: &[LlmMessage],
    on_event: &mut (dyn FnMut(GenerationEvent) + Send),
    cancel: &CancellationToken,
) -> SitegenResult<()> {
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
        stream = model.stream(messages, None) => stream?,
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
            next = stream.next() => next,
        };
        match next {
            Some(chunk) => {
                if let Some(text) = chunk?.content.filter(|t| !t.is_empty()) {
                    on_event(GenerationEvent::Text(text));
                }
            }
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests;
