//! Error types for the MCP server

use edgewiki_devops::DevOpsError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("MCP transport error: {0}")]
    Transport(String),
}

impl From<DevOpsError> for McpError {
    fn from(err: DevOpsError) -> Self {
        match err {
            DevOpsError::Config(msg) => McpError::Config(msg),
            DevOpsError::NotFound(msg) => McpError::NotFound(msg),
            other => McpError::Backend(other.to_string()),
        }
    }
}

impl McpError {
    /// Message shown to the agent in an `isError: true` tool result
    pub fn to_tool_error_message(&self) -> String {
        match self {
            McpError::Config(msg) => format!(
                "Configuration error: {msg}\n\n\
                Sign in with 'az login' (or set AZURE_DEVOPS_PAT in static mode) \
                and restart the server."
            ),
            McpError::InvalidInput(msg) => format!("Invalid input: {msg}"),
            McpError::Backend(msg) => msg.clone(),
            McpError::NotFound(msg) => format!(
                "Not found: {msg}\n\n\
                Hint: pass the path exactly as search_wiki returned it, without decoding."
            ),
            McpError::Serialization(e) => format!("Failed to format results: {e}"),
            McpError::Transport(msg) => format!("Transport error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devops_config_error_maps_to_config() {
        let err: McpError = DevOpsError::config("No personal access token configured").into();
        assert!(matches!(err, McpError::Config(_)));
        assert!(err.to_tool_error_message().contains("az login"));
    }

    #[test]
    fn test_backend_error_message_passthrough() {
        let err: McpError = DevOpsError::RateLimited.into();
        assert_eq!(
            err.to_tool_error_message(),
            "Rate limited - please wait before retrying"
        );
    }
}
