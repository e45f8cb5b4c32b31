//! Tool-calling agent round for project scaffolds

use super::events::GenerationEvent;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::{ChatModel, LlmMessage};
use crate::tools::{ToolCall, ToolError, ToolSet};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of one agent round
#[derive(Debug, Clone, Default)]
pub struct AgentRoundOutcome {
    /// Text the model streamed before requesting tools
    pub content: String,
    /// Tool calls the model requested, in request order
    pub tool_calls: Vec<ToolCall>,
    /// Input messages followed by the assistant turn and the tool results
    pub transcript: Vec<LlmMessage>,
    /// The terminal tool was invoked
    pub exited: bool,
}

/// One streaming model call with tools bound, followed by tool execution
///
/// This is a single round: the model streams text and requests tool calls,
/// then every requested call runs in order against the tool set. Tool results
/// are appended to the transcript but the model is not called again, so it
/// never sees them within the same round. Callers that want a multi-turn
/// agent loop can feed [`AgentRoundOutcome::transcript`] into the next round.
pub struct AgentRound {
    model: Arc<dyn ChatModel>,
    tools: ToolSet,
}

impl AgentRound {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolSet) -> Self {
        Self { model, tools }
    }

    pub async fn run(
        &self,
        messages: Vec<LlmMessage>,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<AgentRoundOutcome> {
        let schemas = self.tools.schemas();
        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
            stream = self.model.stream(&messages, Some(schemas.as_slice())) => stream?,
        };

        let mut outcome = AgentRoundOutcome::default();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk?;

            if let Some(text) = chunk.content.filter(|t| !t.is_empty()) {
                outcome.content.push_str(&text);
                on_event(GenerationEvent::Text(text));
            }
            if let Some(calls) = chunk.tool_calls {
                outcome.tool_calls.extend(calls);
            }
        }

        debug!(
            model = self.model.model_name(),
            content_len = outcome.content.len(),
            tool_calls = outcome.tool_calls.len(),
            "Agent stream finished"
        );

        outcome.transcript = messages;
        outcome.transcript.push(LlmMessage::assistant_with_tools(
            outcome.content.clone(),
            outcome.tool_calls.clone(),
        ));

        for call in &outcome.tool_calls {
            if cancel.is_cancelled() {
                return Err(SitegenError::Cancelled);
            }

            let tool_args = call.arguments_value();
            match self.tools.get(&call.name) {
                Some(tool) => {
                    let result = tool.execute_with_timing(call).await;
                    if result.success {
                        let content = result.content().to_string();
                        debug!(tool = %call.name, elapsed_ms = ?result.execution_time_ms, "Tool succeeded");
                        outcome
                            .transcript
                            .push(LlmMessage::tool(content.clone(), call.id.clone()));
                        on_event(GenerationEvent::ToolResult {
                            tool_name: call.name.clone(),
                            tool_args,
                            tool_content: content,
                        });
                    } else {
                        warn!(tool = %call.name, error = result.content(), "Tool failed");
                        on_event(GenerationEvent::ToolError {
                            tool_name: call.name.clone(),
                            tool_args,
                            tool_error: result.content().to_string(),
                        });
                    }

                    if tool.is_terminal() {
                        info!(tool = %call.name, "Terminal tool invoked, ending round");
                        outcome.exited = true;
                        break;
                    }
                }
                None => {
                    warn!(tool = %call.name, "Model requested an unknown tool");
                    on_event(GenerationEvent::ToolError {
                        tool_name: call.name.clone(),
                        tool_args,
                        tool_error: ToolError::NotFound(call.name.clone()).to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}
