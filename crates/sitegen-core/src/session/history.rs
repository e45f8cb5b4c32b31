//! Persisted chat history
//!
//! The engine only reads history when hydrating a session; hosts append the
//! user turn and the assistant response around each generation.

use crate::error::{SitegenError, SitegenResult};
use crate::llm::LlmMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Stored message type for user turns
pub const MESSAGE_TYPE_USER: &str = "user";
/// Stored message type for model responses
pub const MESSAGE_TYPE_AI: &str = "ai";

/// One persisted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryRecord {
    pub message: String,
    pub message_type: String,
}

impl ChatHistoryRecord {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_type: MESSAGE_TYPE_USER.to_string(),
        }
    }

    pub fn ai(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_type: MESSAGE_TYPE_AI.to_string(),
        }
    }

    /// `user` records become user messages; every other type is the assistant
    pub fn to_message(&self) -> LlmMessage {
        if self.message_type == MESSAGE_TYPE_USER {
            LlmMessage::user(self.message.clone())
        } else {
            LlmMessage::assistant(self.message.clone())
        }
    }
}

/// Store of chat history keyed by target id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistoryProvider: Send + Sync {
    /// All records for a target, oldest first
    async fn load_history(&self, target_id: &str) -> SitegenResult<Vec<ChatHistoryRecord>>;

    /// Append a record for a target
    async fn append(&self, target_id: &str, record: ChatHistoryRecord) -> SitegenResult<()>;
}

/// Process-local history, lost on exit
#[derive(Debug, Default)]
pub struct InMemoryChatHistory {
    records: parking_lot::Mutex<HashMap<String, Vec<ChatHistoryRecord>>>,
}

impl InMemoryChatHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatHistoryProvider for InMemoryChatHistory {
    async fn load_history(&self, target_id: &str) -> SitegenResult<Vec<ChatHistoryRecord>> {
        Ok(self
            .records
            .lock()
            .get(target_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, target_id: &str, record: ChatHistoryRecord) -> SitegenResult<()> {
        self.records
            .lock()
            .entry(target_id.to_string())
            .or_default()
            .push(record);
        Ok(())
    }
}

/// History stored as one JSONL file per target
///
/// ```text
/// <base>/
///   42.jsonl
///   landing-page.jsonl
/// ```
#[derive(Debug)]
pub struct JsonlChatHistory {
    base_path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlChatHistory {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn history_path(&self, target_id: &str) -> PathBuf {
        let file_stem: String = target_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.jsonl", file_stem))
    }
}

#[async_trait]
impl ChatHistoryProvider for JsonlChatHistory {
    async fn load_history(&self, target_id: &str) -> SitegenResult<Vec<ChatHistoryRecord>> {
        let path = self.history_path(target_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path).await.map_err(|e| {
            SitegenError::io_with_path(
                format!("Failed to open history file: {}", e),
                path.display().to_string(),
            )
        })?;

        let mut lines = BufReader::new(file).lines();
        let mut records = Vec::new();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| SitegenError::io(format!("Failed to read line: {}", e)))?
        {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ChatHistoryRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(target_id, "Skipping malformed history line: {}", e),
            }
        }

        tracing::debug!(target_id, count = records.len(), "Loaded chat history");
        Ok(records)
    }

    async fn append(&self, target_id: &str, record: ChatHistoryRecord) -> SitegenResult<()> {
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            SitegenError::io(format!("Failed to create history directory: {}", e))
        })?;

        let mut line = serde_json::to_string(&record)
            .map_err(|e| SitegenError::json(format!("Failed to serialize record: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.history_path(target_id))
            .await
            .map_err(|e| SitegenError::io(format!("Failed to open history file: {}", e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SitegenError::io(format!("Failed to write history record: {}", e)))?;

        Ok(())
    }
}
