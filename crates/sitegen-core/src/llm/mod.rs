//! LLM client layer
//!
//! Everything the engine needs from a language model goes through the
//! [`ChatModel`] trait: a one-shot `invoke` and a chunked `stream` that may
//! carry tool calls. [`ModelProvider`] hands out the model configured for a
//! [`ModelRole`].

pub mod client;
pub mod converters;
pub mod messages;
pub mod openai_stream;
pub mod provider;
pub mod scripted;
pub mod sse_decoder;
pub mod streaming;

pub use client::{ChatModel, OpenAiCompatibleClient};
pub use messages::{LlmMessage, LlmResponse, LlmUsage, MessageRole};
pub use provider::{ConfiguredModelProvider, ModelProvider, ModelRole, SingleModelProvider};
pub use scripted::{RecordedCall, ScriptedChatModel};
pub use streaming::{LlmStream, StreamChunk, collect_stream};
