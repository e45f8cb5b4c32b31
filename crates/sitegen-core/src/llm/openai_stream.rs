//! OpenAI-compatible SSE stream parser
//!
//! Text deltas are forwarded as they arrive. Tool-call deltas are keyed by
//! their `index` and accumulated until the choice finishes, then emitted as a
//! single chunk of complete [`ToolCall`]s ahead of the final chunk.

use crate::error::{SitegenError, SitegenResult};
use crate::llm::converters::parse_arguments;
use crate::llm::messages::LlmUsage;
use crate::llm::sse_decoder::{SseDecoder, SseEvent};
use crate::llm::streaming::{LlmStream, StreamChunk};
use crate::tools::ToolCall;
use futures::StreamExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct PartialToolCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

#[derive(Debug, Default)]
struct StreamState {
    decoder: SseDecoder,
    tool_calls: BTreeMap<u64, PartialToolCall>,
    finish_reason: Option<String>,
    usage: Option<LlmUsage>,
    finished: bool,
}

impl StreamState {
    fn process(&mut self, events: Vec<SseEvent>, chunks: &mut Vec<SitegenResult<StreamChunk>>) {
        for event in events {
            if self.finished {
                break;
            }
            if event.is_done() {
                self.finish(chunks);
                break;
            }

            let data: Value = match serde_json::from_str(&event.data) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!("Skipping malformed stream event: {}", e);
                    continue;
                }
            };

            if let Some(message) = data["error"]["message"].as_str() {
                chunks.push(Err(SitegenError::llm(format!("Stream error: {}", message))));
                self.finished = true;
                break;
            }

            if let Some(usage) = parse_usage(&data["usage"]) {
                self.usage = Some(usage);
            }

            let Some(choice) = data["choices"].get(0) else {
                continue;
            };
            let delta = &choice["delta"];

            if let Some(content) = delta["content"].as_str() {
                if !content.is_empty() {
                    chunks.push(Ok(StreamChunk::content(content)));
                }
            }

            if let Some(calls) = delta["tool_calls"].as_array() {
                for (position, call) in calls.iter().enumerate() {
                    let index = call["index"].as_u64().unwrap_or(position as u64);
                    let partial = self.tool_calls.entry(index).or_default();
                    if let Some(id) = call["id"].as_str() {
                        partial.id = Some(id.to_string());
                    }
                    if let Some(name) = call["function"]["name"].as_str() {
                        partial.name.push_str(name);
                    }
                    if let Some(args) = call["function"]["arguments"].as_str() {
                        partial.arguments.push_str(args);
                    }
                }
            }

            if let Some(reason) = choice["finish_reason"].as_str() {
                self.finish_reason = Some(reason.to_string());
            }
        }
    }

    /// Emit accumulated tool calls and the final chunk, once
    fn finish(&mut self, chunks: &mut Vec<SitegenResult<StreamChunk>>) {
        if self.finished {
            return;
        }
        self.finished = true;

        if !self.tool_calls.is_empty() {
            let calls = std::mem::take(&mut self.tool_calls)
                .into_iter()
                .map(|(index, partial)| {
                    let id = partial
                        .id
                        .unwrap_or_else(|| format!("call_{}", index));
                    ToolCall::new(id, partial.name, parse_arguments(&partial.arguments))
                })
                .collect();
            chunks.push(Ok(StreamChunk::tool_calls(calls)));
        }

        let reason = self.finish_reason.take().or_else(|| Some("stop".to_string()));
        chunks.push(Ok(StreamChunk::final_chunk(self.usage.take(), reason)));
    }
}

fn parse_usage(value: &Value) -> Option<LlmUsage> {
    if !value.is_object() {
        return None;
    }
    let field = |name: &str| value[name].as_u64().unwrap_or(0) as u32;
    Some(LlmUsage {
        prompt_tokens: field("prompt_tokens"),
        completion_tokens: field("completion_tokens"),
        total_tokens: field("total_tokens"),
    })
}

/// Parse an OpenAI-compatible SSE byte stream into an [`LlmStream`]
///
/// Servers that close the connection without `[DONE]` still get their
/// pending tool calls and a final chunk.
pub fn openai_sse_stream<S, B, E>(byte_stream: S) -> LlmStream
where
    S: futures::Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = Arc::new(Mutex::new(StreamState::default()));
    let tail_state = state.clone();

    let body = byte_stream.flat_map(move |chunk_result| {
        let state = state.clone();
        futures::stream::once(async move {
            let mut state = state.lock().await;
            let mut chunks = Vec::new();
            match chunk_result {
                Ok(bytes) if !state.finished => {
                    let events = state.decoder.feed(bytes.as_ref());
                    state.process(events, &mut chunks);
                }
                Ok(_) => {}
                Err(e) => {
                    chunks.push(Err(SitegenError::llm(format!("Stream error: {}", e))));
                    state.finished = true;
                }
            }
            futures::stream::iter(chunks)
        })
        .flatten()
    });

    let tail = futures::stream::once(async move {
        let mut state = tail_state.lock().await;
        let mut chunks = Vec::new();
        if let Some(event) = state.decoder.finish() {
            state.process(vec![event], &mut chunks);
        }
        state.finish(&mut chunks);
        futures::stream::iter(chunks)
    })
    .flatten();

    Box::pin(body.chain(tail))
}
