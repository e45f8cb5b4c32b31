//! Offline chat model that replays scripted turns
//!
//! Each call to [`ChatModel::invoke`] or [`ChatModel::stream`] consumes the
//! next scripted turn and records the messages it was given, so callers can
//! assert on exactly what the engine sent.

use crate::error::{SitegenError, SitegenResult};
use crate::llm::client::ChatModel;
use crate::llm::messages::{LlmMessage, LlmResponse};
use crate::llm::streaming::{LlmStream, StreamChunk, collect_stream};
use crate::tools::{ToolCall, ToolSchema};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Turn {
    Chunks(Vec<StreamChunk>),
    Fail(String),
}

/// A recorded model call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<LlmMessage>,
    /// Names of the tools offered on this call
    pub tool_names: Vec<String>,
}

/// Chat model backed by a queue of canned responses
#[derive(Debug)]
pub struct ScriptedChatModel {
    name: String,
    turns: Mutex<VecDeque<Turn>>,
    fallback: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChatModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turns: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response, streamed in pieces of at most `chunk_size` chars
    pub fn with_text_chunked(self, text: &str, chunk_size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks: Vec<StreamChunk> = chars
            .chunks(chunk_size.max(1))
            .map(|piece| StreamChunk::content(piece.iter().collect::<String>()))
            .collect();
        chunks.push(StreamChunk::final_chunk(None, Some("stop".to_string())));
        self.push(Turn::Chunks(chunks))
    }

    /// Queue a text response streamed as a single chunk
    pub fn with_text(self, text: &str) -> Self {
        self.with_text_chunked(text, usize::MAX)
    }

    /// Queue a turn that requests tool calls, optionally preceded by text
    pub fn with_tool_calls(self, text: &str, calls: Vec<ToolCall>) -> Self {
        let mut chunks = Vec::new();
        if !text.is_empty() {
            chunks.push(StreamChunk::content(text));
        }
        chunks.push(StreamChunk::tool_calls(calls));
        chunks.push(StreamChunk::final_chunk(None, Some("tool_calls".to_string())));
        self.push(Turn::Chunks(chunks))
    }

    /// Queue a failing call
    pub fn with_error(self, message: &str) -> Self {
        self.push(Turn::Fail(message.to_string()))
    }

    /// Response used once the queue is exhausted; otherwise calls fail
    pub fn with_fallback(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    fn push(self, turn: Turn) -> Self {
        self.turns.lock().push_back(turn);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn next_turn(&self, messages: &[LlmMessage], tools: Option<&[ToolSchema]>) -> Turn {
        self.calls.lock().push(RecordedCall {
            messages: messages.to_vec(),
            tool_names: tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
        });

        match self.turns.lock().pop_front() {
            Some(turn) => turn,
            None => match &self.fallback {
                Some(text) => Turn::Chunks(vec![
                    StreamChunk::content(text.clone()),
                    StreamChunk::final_chunk(None, Some("stop".to_string())),
                ]),
                None => Turn::Fail(format!("{}: no scripted response left", self.name)),
            },
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, messages: &[LlmMessage]) -> SitegenResult<LlmResponse> {
        match self.next_turn(messages, None) {
            Turn::Chunks(chunks) => {
                let stream: LlmStream = Box::pin(futures::stream::iter(chunks.into_iter().map(Ok)));
                collect_stream(stream).await
            }
            Turn::Fail(message) => Err(SitegenError::llm(message)),
        }
    }

    async fn stream(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> SitegenResult<LlmStream> {
        match self.next_turn(messages, tools) {
            Turn::Chunks(chunks) => Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok)))),
            Turn::Fail(message) => Err(SitegenError::llm(message)),
        }
    }
}
