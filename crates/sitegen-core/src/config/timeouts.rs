//! Default timeout and interval values
//!
//! All values can be overridden via configuration.

use std::time::Duration;

/// Default timeout values for LLM operations
pub mod llm {
    use super::*;

    /// Connection timeout for LLM APIs (30 seconds)
    pub const CONNECTION_SECS: u64 = 30;

    /// Whole-request timeout for LLM APIs, streaming included (10 minutes)
    pub const REQUEST_SECS: u64 = 600;

    pub fn connection_timeout() -> Duration {
        Duration::from_secs(CONNECTION_SECS)
    }

    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Session cache lifetimes
pub mod session {
    use super::*;

    /// Idle time after which a cached session is evicted (30 minutes)
    pub const TTL_SECS: u64 = 30 * 60;

    /// Interval between eviction sweeps (5 minutes)
    pub const SWEEP_INTERVAL_SECS: u64 = 5 * 60;

    pub fn ttl() -> Duration {
        Duration::from_secs(TTL_SECS)
    }

    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECS)
    }
}

/// Project build step
pub mod build {
    use super::*;

    /// Hard wall-clock limit for each build command (5 minutes)
    pub const COMMAND_SECS: u64 = 5 * 60;

    pub fn command_timeout() -> Duration {
        Duration::from_secs(COMMAND_SECS)
    }
}
