//! Conversation sessions
//!
//! A session is the bounded message history for one `(output_type, target_id)`
//! pair. Sessions are hydrated from a [`ChatHistoryProvider`] on first access,
//! kept in a [`SessionCache`] and evicted after a period of inactivity.

mod cache;
mod clock;
mod history;

pub use cache::{ConversationSession, SessionCache, SessionHandle, SessionKey, SweeperHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{
    ChatHistoryProvider, ChatHistoryRecord, InMemoryChatHistory, JsonlChatHistory, MESSAGE_TYPE_AI,
    MESSAGE_TYPE_USER,
};

#[cfg(test)]
pub use history::MockChatHistoryProvider;
