//! Server-Sent Events decoder for model streaming responses
//!
//! Network chunks do not respect event boundaries, and a multi-byte UTF-8
//! character can be split between two chunks. The decoder keeps raw bytes
//! until a blank-line delimiter arrives; since the delimiter is ASCII, every
//! completed event is decoded whole.

mod event;

pub use event::SseEvent;

/// Buffered SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, delimiter_len)) = Self::find_boundary(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + delimiter_len).collect();
            if let Some(event) = Self::parse_event(&raw[..end]) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing event the server did not terminate with a blank line
    pub fn finish(&mut self) -> Option<SseEvent> {
        let raw = std::mem::take(&mut self.buffer);
        Self::parse_event(&raw)
    }

    /// Whether undelivered bytes remain
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn find_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
        let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));
        let crlf = buffer
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|p| (p, 4));

        match (lf, crlf) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    fn parse_event(raw: &[u8]) -> Option<SseEvent> {
        let text = String::from_utf8_lossy(raw);
        let mut event_type = None;
        let mut data_lines: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(value) = line.strip_prefix("data:") {
                data_lines.push(value.strip_prefix(' ').unwrap_or(value));
            } else if let Some(value) = line.strip_prefix("event:") {
                event_type = Some(value.trim().to_string());
            }
        }

        if data_lines.is_empty() {
            return None;
        }

        Some(SseEvent {
            event_type,
            data: data_lines.join("\n"),
        })
    }
}
