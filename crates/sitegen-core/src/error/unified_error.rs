//! UnifiedError trait implementation for SitegenError

use super::types::{SitegenError, UnifiedError};

impl UnifiedError for SitegenError {
    fn error_code(&self) -> &str {
        match self {
            Self::InputRejected { .. } => "SITEGEN_INPUT_REJECTED",
            Self::Config { .. } => "SITEGEN_CONFIG",
            Self::Llm { .. } => "SITEGEN_LLM",
            Self::Tool { .. } => "SITEGEN_TOOL",
            Self::Build { .. } => "SITEGEN_BUILD",
            Self::Io { .. } => "SITEGEN_IO",
            Self::Json { .. } => "SITEGEN_JSON",
            Self::Http { .. } => "SITEGEN_HTTP",
            Self::Timeout { .. } => "SITEGEN_TIMEOUT",
            Self::Cancelled => "SITEGEN_CANCELLED",
            Self::Other { .. } => "SITEGEN_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::InputRejected { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Llm { message, .. } => message,
            Self::Tool { message, .. } => message,
            Self::Build { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Timeout { .. } => "Operation timed out",
            Self::Cancelled => "Operation was cancelled",
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::InputRejected { rule, .. } => Some(rule),
            Self::Config { context, .. } => context.as_deref(),
            Self::Llm { context, .. } => context.as_deref(),
            Self::Tool { context, .. } => context.as_deref(),
            Self::Build { command, .. } => command.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Http { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::Cancelled => None,
            Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status_code, .. } => {
                matches!(status_code, None | Some(408) | Some(429) | Some(500..=599))
            }
            Self::Timeout { .. } | Self::Llm { .. } => true,
            _ => false,
        }
    }
}
