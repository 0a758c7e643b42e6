//! Error types for the Azure DevOps client

use thiserror::Error;

/// Result type alias for Azure DevOps operations
pub type Result<T> = std::result::Result<T, DevOpsError>;

#[derive(Error, Debug)]
pub enum DevOpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized - token may be expired or lack access")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl DevOpsError {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            // Azure DevOps answers a rejected credential with a 203 sign-in page
            203 | 401 => DevOpsError::Unauthorized,
            403 => DevOpsError::AccessDenied(truncated),
            404 => DevOpsError::NotFound(truncated),
            429 => DevOpsError::RateLimited,
            500..=599 => DevOpsError::Server(truncated),
            _ => DevOpsError::InvalidResponse(format!("Status {status}: {truncated}")),
        }
    }
}

impl From<DevOpsError> for edgewiki_core::Error {
    fn from(err: DevOpsError) -> Self {
        match err {
            DevOpsError::Config(msg) => edgewiki_core::Error::Config(msg),
            other => edgewiki_core::Error::with_context("Azure DevOps request failed", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            DevOpsError::from_status(StatusCode::UNAUTHORIZED, ""),
            DevOpsError::Unauthorized
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::NON_AUTHORITATIVE_INFORMATION, "<html>"),
            DevOpsError::Unauthorized
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::FORBIDDEN, "no"),
            DevOpsError::AccessDenied(_)
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::NOT_FOUND, "missing"),
            DevOpsError::NotFound(_)
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            DevOpsError::RateLimited
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::BAD_GATEWAY, ""),
            DevOpsError::Server(_)
        ));
        assert!(matches!(
            DevOpsError::from_status(StatusCode::BAD_REQUEST, "bad"),
            DevOpsError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "é".repeat(400);
        match DevOpsError::from_status(StatusCode::NOT_FOUND, &body) {
            DevOpsError::NotFound(msg) => {
                assert!(msg.contains("truncated, 800 total bytes"));
                assert!(msg.len() < 600);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
