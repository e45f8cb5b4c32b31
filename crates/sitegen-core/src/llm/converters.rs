//! Conversion of messages and tool schemas to the OpenAI chat format

use crate::llm::messages::LlmMessage;
use crate::tools::{ToolCall, ToolSchema};
use serde_json::{Map, Value, json};

/// Convert messages for the OpenAI chat completions API
pub fn messages_to_openai(messages: &[LlmMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let mut msg = json!({
                "role": message.role.to_string(),
                "content": message.content,
            });

            if let Some(tool_calls) = &message.tool_calls {
                msg["tool_calls"] = Value::Array(tool_calls.iter().map(tool_call_to_openai).collect());
            }
            if let Some(tool_call_id) = &message.tool_call_id {
                msg["tool_call_id"] = json!(tool_call_id);
            }
            msg
        })
        .collect()
}

fn tool_call_to_openai(call: &ToolCall) -> Value {
    json!({
        "id": call.id,
        "type": "function",
        "function": {
            "name": call.name,
            "arguments": Value::Object(call.arguments.clone()).to_string(),
        }
    })
}

/// Convert tool schemas to OpenAI function definitions
pub fn tools_to_openai(tools: &[ToolSchema]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Parse a tool call's JSON-encoded argument string
///
/// Models occasionally send an empty string for argument-less calls; that and
/// anything unparsable become an empty object so the tool reports the missing
/// argument itself.
pub fn parse_arguments(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            tracing::warn!("Discarding unparsable tool arguments: {}", raw);
            Map::new()
        }
    }
}
