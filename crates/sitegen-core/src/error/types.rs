//! Core error types and traits for Sitegen

use thiserror::Error;

/// Result type alias for Sitegen operations
pub type SitegenResult<T> = Result<T, SitegenError>;

/// Unified error trait implemented by [`SitegenError`].
///
/// Provides a programmatic code, the human-readable message and optional
/// context, independent of the variant.
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> SitegenResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> SitegenResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> SitegenResult<T> {
        self.map_err(|e| SitegenError::other(format!("{}: {}", context, e)))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> SitegenResult<T> {
        self.map_err(|e| SitegenError::other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with context message
    fn context<C: std::fmt::Display>(self, context: C) -> SitegenResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> SitegenResult<T> {
        self.ok_or_else(|| SitegenError::other(context.to_string()))
    }
}

/// Main error type for Sitegen
#[derive(Error, Debug, Clone)]
pub enum SitegenError {
    /// Guardrail rejected the user input before any model call
    #[error("Invalid input: {message}")]
    InputRejected {
        message: String,
        /// Name of the guardrail rule that matched
        rule: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Model call or stream failure
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        context: Option<String>,
    },

    /// Tool execution errors
    #[error("Tool error: {tool_name}: {message}")]
    Tool {
        tool_name: String,
        message: String,
        context: Option<String>,
    },

    /// Project build step failure
    #[error("Build error: {message}")]
    Build {
        message: String,
        command: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Operation timeout
    #[error("Operation timed out after {seconds} seconds")]
    Timeout {
        seconds: u64,
        context: Option<String>,
    },

    /// Operation was cancelled by the caller
    #[error("Operation was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
