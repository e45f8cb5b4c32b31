//! Streaming response support

use crate::error::SitegenResult;
use crate::llm::messages::{LlmResponse, LlmUsage};
use crate::tools::ToolCall;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A chunk of streaming response data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text
    pub content: Option<String>,
    /// Fully assembled tool calls
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Usage information, usually only on the last chunk
    pub usage: Option<LlmUsage>,
    pub is_final: bool,
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    /// Create a new content chunk
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Create a final chunk with usage information
    pub fn final_chunk(usage: Option<LlmUsage>, finish_reason: Option<String>) -> Self {
        Self {
            usage,
            is_final: true,
            finish_reason,
            ..Self::default()
        }
    }

    /// Create a tool call chunk
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::default()
        }
    }
}

/// Stream of LLM response chunks
pub type LlmStream = Pin<Box<dyn Stream<Item = SitegenResult<StreamChunk>> + Send>>;

/// Collect a stream into a complete response
pub async fn collect_stream(mut stream: LlmStream) -> SitegenResult<LlmResponse> {
    let mut response = LlmResponse::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(content) = chunk.content {
            response.content.push_str(&content);
        }
        if let Some(calls) = chunk.tool_calls {
            response.tool_calls.extend(calls);
        }
        if chunk.is_final {
            response.usage = chunk.usage;
            response.finish_reason = chunk.finish_reason;
        }
    }

    Ok(response)
}
