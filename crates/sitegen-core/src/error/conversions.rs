//! From trait implementations for SitegenError conversions

use super::types::SitegenError;

impl From<std::io::Error> for SitegenError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for SitegenError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for SitegenError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

impl From<tokio::task::JoinError> for SitegenError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            Self::Cancelled
        } else {
            Self::other(format!("Task failed: {}", error))
        }
    }
}

impl From<crate::tools::ToolError> for SitegenError {
    fn from(err: crate::tools::ToolError) -> Self {
        use crate::tools::ToolError;
        match err {
            ToolError::NotFound(name) => SitegenError::tool(name, "Tool not found"),
            other => SitegenError::tool("unknown", other.to_string()),
        }
    }
}
