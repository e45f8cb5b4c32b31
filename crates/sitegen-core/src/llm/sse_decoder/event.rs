//! SSE event type

/// A parsed SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the `event:` field, if any
    pub event_type: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: String,
}

impl SseEvent {
    /// OpenAI-style end-of-stream marker
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}
