//! Chat model trait and the OpenAI-compatible HTTP client

use crate::config::ModelConfig;
use crate::config::timeouts;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::converters::{messages_to_openai, parse_arguments, tools_to_openai};
use crate::llm::messages::{LlmMessage, LlmResponse, LlmUsage};
use crate::llm::openai_stream::openai_sse_stream;
use crate::llm::streaming::LlmStream;
use crate::tools::{ToolCall, ToolSchema};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;

/// A chat model the engine can call
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logs
    fn model_name(&self) -> &str;

    /// Single request/response call
    async fn invoke(&self, messages: &[LlmMessage]) -> SitegenResult<LlmResponse>;

    /// Streaming call; `tools` are offered to the model when present
    async fn stream(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> SitegenResult<LlmStream>;
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI protocol
///
/// Covers hosted OpenAI-compatible services as well as Ollama's `/v1` API.
pub struct OpenAiCompatibleClient {
    config: ModelConfig,
    http_client: Client,
    request_timeout: Duration,
}

impl OpenAiCompatibleClient {
    /// Create a client with the given whole-request timeout
    pub fn new(config: ModelConfig, request_timeout: Duration) -> SitegenResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(timeouts::llm::connection_timeout())
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                SitegenError::config_with_context(
                    format!("Failed to build HTTP client: {}", e),
                    config.base_url.clone(),
                )
            })?;
        Ok(Self {
            config,
            http_client,
            request_timeout,
        })
    }

    /// Create a client sharing an existing connection pool
    pub fn with_http_client(config: ModelConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
            request_timeout: timeouts::llm::request_timeout(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
        stream: bool,
    ) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": messages_to_openai(messages),
        });
        if stream {
            body["stream"] = json!(true);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = json!(tools_to_openai(tools));
        }
        body
    }

    async fn send(&self, body: &Value) -> SitegenResult<reqwest::Response> {
        let mut request = self.http_client.post(self.endpoint()).json(body);
        if let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SitegenError::timeout_with_context(
                    self.request_timeout.as_secs(),
                    format!("Request to {}", self.config.model),
                )
            } else {
                SitegenError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SitegenError::http_with_status(
                format!("Model API error (status {}): {}", status, error_text),
                status.as_u16(),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, messages), fields(model = %self.config.model), level = "debug")]
    async fn invoke(&self, messages: &[LlmMessage]) -> SitegenResult<LlmResponse> {
        let body = self.request_body(messages, None, false);
        let response = self.send(&body).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| SitegenError::llm(format!("Failed to parse model response: {}", e)))?;
        parse_completion(json)
    }

    #[instrument(skip(self, messages, tools), fields(model = %self.config.model), level = "debug")]
    async fn stream(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> SitegenResult<LlmStream> {
        let body = self.request_body(messages, tools, true);
        let response = self.send(&body).await?;
        Ok(openai_sse_stream(response.bytes_stream()))
    }
}

/// Parse a non-streaming chat completion
pub fn parse_completion(json: Value) -> SitegenResult<LlmResponse> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| SitegenError::llm("Model response contained no choices"))?;
    let message = &choice["message"];

    let tool_calls = message["tool_calls"]
        .as_array()
        .map(|calls| {
            calls
                .iter()
                .enumerate()
                .map(|(i, call)| {
                    let id = call["id"]
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("call_{}", i));
                    let name = call["function"]["name"].as_str().unwrap_or_default();
                    let args = call["function"]["arguments"].as_str().unwrap_or_default();
                    ToolCall::new(id, name, parse_arguments(args))
                })
                .collect()
        })
        .unwrap_or_default();

    let usage = json["usage"].as_object().map(|u| {
        let field = |name: &str| u.get(name).and_then(Value::as_u64).unwrap_or(0) as u32;
        LlmUsage {
            prompt_tokens: field("prompt_tokens"),
            completion_tokens: field("completion_tokens"),
            total_tokens: field("total_tokens"),
        }
    });

    Ok(LlmResponse {
        content: message["content"].as_str().unwrap_or_default().to_string(),
        tool_calls,
        usage,
        model: json["model"].as_str().map(str::to_string),
        finish_reason: choice["finish_reason"].as_str().map(str::to_string),
    })
}
