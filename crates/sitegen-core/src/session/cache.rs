//! Session cache with single-flight hydration and idle eviction

use super::clock::{Clock, SystemClock};
use super::history::ChatHistoryProvider;
use crate::config::SessionConfig;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::LlmMessage;
use crate::types::OutputType;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex as AsyncMutex, OwnedMappedMutexGuard, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Identity of a conversation session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub output_type: OutputType,
    pub target_id: String,
}

impl SessionKey {
    pub fn new(output_type: OutputType, target_id: impl Into<String>) -> Self {
        Self {
            output_type,
            target_id: target_id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.output_type, self.target_id)
    }
}

/// Bounded message history for one key
#[derive(Debug, Clone)]
pub struct ConversationSession {
    key: SessionKey,
    messages: Vec<LlmMessage>,
    max_messages: usize,
    last_access: Instant,
}

impl ConversationSession {
    pub fn new(key: SessionKey, messages: Vec<LlmMessage>, max_messages: usize, now: Instant) -> Self {
        let mut session = Self {
            key,
            messages,
            max_messages,
            last_access: now,
        };
        session.trim();
        session
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Messages, oldest first
    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    pub fn last_access(&self) -> Instant {
        self.last_access
    }

    /// Append a message, dropping the oldest beyond the cap
    pub fn push(&mut self, message: LlmMessage) {
        self.messages.push(message);
        self.trim();
    }

    fn trim(&mut self) {
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}

type Slot = Arc<AsyncMutex<Option<ConversationSession>>>;

struct CacheInner {
    slots: Mutex<HashMap<SessionKey, Slot>>,
    history: Arc<dyn ChatHistoryProvider>,
    clock: Arc<dyn Clock>,
    max_messages: usize,
    ttl: Duration,
    sweeper: Mutex<Option<CancellationToken>>,
}

impl CacheInner {
    fn slot(&self, key: &SessionKey) -> Slot {
        self.slots
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(None)))
            .clone()
    }

    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.lock();
        let before = slots.len();

        slots.retain(|key, slot| {
            // Slots referenced elsewhere are in use or about to be.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let Ok(guard) = slot.try_lock() else {
                return true;
            };
            match guard.as_ref() {
                Some(session) if now.saturating_duration_since(session.last_access) <= self.ttl => true,
                Some(_) => {
                    debug!(session = %key, "Evicting idle session");
                    false
                }
                None => false,
            }
        });

        before - slots.len()
    }
}

/// Cache of live conversation sessions
///
/// At most one [`ConversationSession`] exists per key. Concurrent requests
/// for the same key queue on a per-key async mutex, so history is fetched at
/// most once and mutations never interleave. Other keys are unaffected.
#[derive(Clone)]
pub struct SessionCache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("sessions", &self.len())
            .field("max_messages", &self.inner.max_messages)
            .field("ttl", &self.inner.ttl)
            .finish()
    }
}

impl SessionCache {
    pub fn new(history: Arc<dyn ChatHistoryProvider>, config: &SessionConfig) -> Self {
        Self::with_clock(history, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        history: Arc<dyn ChatHistoryProvider>,
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                slots: Mutex::new(HashMap::new()),
                history,
                clock,
                max_messages: config.max_messages,
                ttl: config.ttl,
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Get the session for a key, hydrating it from history on a miss
    ///
    /// The returned handle holds the key's lock until dropped.
    pub async fn get(&self, output_type: OutputType, target_id: &str) -> SitegenResult<SessionHandle> {
        let key = SessionKey::new(output_type, target_id);
        let mut guard = self.inner.slot(&key).lock_owned().await;

        if guard.is_none() {
            let records = self.inner.history.load_history(target_id).await?;
            let messages = records.iter().map(|r| r.to_message()).collect();
            debug!(session = %key, records = records.len(), "Hydrated session from history");
            *guard = Some(ConversationSession::new(
                key.clone(),
                messages,
                self.inner.max_messages,
                self.inner.clock.now(),
            ));
        }

        let mut guard = OwnedMutexGuard::try_map(guard, |slot| slot.as_mut())
            .map_err(|_| SitegenError::other(format!("Session {} was not hydrated", key)))?;
        guard.last_access = self.inner.clock.now();

        Ok(SessionHandle {
            guard,
            clock: self.inner.clock.clone(),
        })
    }

    /// Insert or replace a session with the given messages
    pub async fn put(&self, output_type: OutputType, target_id: &str, messages: Vec<LlmMessage>) {
        let key = SessionKey::new(output_type, target_id);
        let mut guard = self.inner.slot(&key).lock_owned().await;
        *guard = Some(ConversationSession::new(
            key,
            messages,
            self.inner.max_messages,
            self.inner.clock.now(),
        ));
    }

    /// Drop a session; the next access rehydrates it
    ///
    /// Waits for an outstanding [`SessionHandle`] on the key to be released.
    /// The slot stays shared with waiters, so the key never has two live
    /// sessions.
    pub async fn remove(&self, output_type: OutputType, target_id: &str) -> bool {
        let key = SessionKey::new(output_type, target_id);
        let slot = self.inner.slots.lock().get(&key).cloned();
        let Some(slot) = slot else {
            return false;
        };

        let removed = slot.lock().await.take().is_some();
        drop(slot);

        let mut slots = self.inner.slots.lock();
        if slots.get(&key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&key);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict sessions idle longer than the TTL, returning how many were removed
    pub fn sweep(&self) -> usize {
        let evicted = self.inner.sweep();
        if evicted > 0 {
            info!(evicted, remaining = self.len(), "Session sweep completed");
        }
        evicted
    }

    /// Run [`sweep`](Self::sweep) every `interval` on a background task
    ///
    /// Replaces any sweeper already running. The task stops on
    /// [`stop_sweeper`](Self::stop_sweeper), when the returned handle is
    /// dropped, or when the cache itself is dropped.
    pub fn start_sweeper(&self, interval: Duration) -> SweeperHandle {
        let token = CancellationToken::new();
        if let Some(previous) = self.inner.sweeper.lock().replace(token.clone()) {
            previous.cancel();
        }

        let weak: Weak<CacheInner> = Arc::downgrade(&self.inner);
        let task_token = token.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        let evicted = inner.sweep();
                        if evicted > 0 {
                            info!(evicted, "Session sweep completed");
                        }
                    }
                }
            }
            debug!("Session sweeper stopped");
        });

        SweeperHandle { token }
    }

    /// Stop the background sweeper, if running
    pub fn stop_sweeper(&self) {
        if let Some(token) = self.inner.sweeper.lock().take() {
            token.cancel();
        }
    }
}

/// Stops the background sweeper when dropped
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
}

impl SweeperHandle {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Exclusive access to one live session
pub struct SessionHandle {
    guard: OwnedMappedMutexGuard<Option<ConversationSession>, ConversationSession>,
    clock: Arc<dyn Clock>,
}

impl SessionHandle {
    pub fn key(&self) -> &SessionKey {
        self.guard.key()
    }

    /// Messages, oldest first
    pub fn messages(&self) -> &[LlmMessage] {
        self.guard.messages()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    /// Append a user message, keeping only the most recent messages
    pub fn append_user(&mut self, message: impl Into<String>) {
        self.append(LlmMessage::user(message));
    }

    pub fn append(&mut self, message: LlmMessage) {
        self.guard.push(message);
        self.guard.last_access = self.clock.now();
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("key", &self.key().to_string())
            .field("messages", &self.len())
            .finish()
    }
}
