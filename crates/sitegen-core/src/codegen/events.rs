//! Events emitted while a response is generated

use serde::Serialize;
use serde_json::Value;

/// One unit of generation output, in generation order
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// A text delta from the model
    Text(String),
    /// A tool call completed
    ToolResult {
        tool_name: String,
        tool_args: Value,
        tool_content: String,
    },
    /// A tool call failed; generation continues
    ToolError {
        tool_name: String,
        tool_args: Value,
        tool_error: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolResultPayload<'a> {
    tool_content: &'a str,
    tool_name: &'a str,
    tool_args: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolErrorPayload<'a> {
    tool_name: &'a str,
    tool_args: &'a Value,
    tool_error: &'a str,
}

impl GenerationEvent {
    /// Text chunk as relayed to clients
    ///
    /// Tool results are framed by newlines so they stand apart from the
    /// surrounding prose when a client concatenates chunks.
    pub fn to_wire(&self) -> String {
        match self {
            GenerationEvent::Text(text) => text.clone(),
            GenerationEvent::ToolResult {
                tool_name,
                tool_args,
                tool_content,
            } => {
                let payload = ToolResultPayload {
                    tool_content,
                    tool_name,
                    tool_args,
                };
                format!("\n{}\n\n", to_json(&payload))
            }
            GenerationEvent::ToolError {
                tool_name,
                tool_args,
                tool_error,
            } => {
                let payload = ToolErrorPayload {
                    tool_name,
                    tool_args,
                    tool_error,
                };
                format!("{}\n", to_json(&payload))
            }
        }
    }

    /// Text delta, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GenerationEvent::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn to_json<T: Serialize>(payload: &T) -> String {
    // Payloads are plain strings and JSON values, which always serialize.
    serde_json::to_string(payload).unwrap_or_default()
}
