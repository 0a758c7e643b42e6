//! Error types for token acquisition

use thiserror::Error;

/// Result type alias for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while acquiring an access token
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential source cannot produce a token in this environment
    #[error("{source_name} unavailable: {message}")]
    CredentialUnavailable {
        source_name: String,
        message: String,
    },

    /// Every credential in a chain failed
    #[error("All credentials failed:\n{}", .0.join("\n"))]
    ChainExhausted(Vec<String>),

    /// An external process failed
    #[error("Process error: {0}")]
    Process(String),

    /// HTTP failure talking to the identity provider
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity provider answered with something we cannot use
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// Interactive login did not complete in time
    #[error("Timed out after {0}s waiting for login")]
    Timeout(u64),
}

impl AuthError {
    /// Creates a credential-unavailable error
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CredentialUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<AuthError> for edgewiki_core::Error {
    fn from(err: AuthError) -> Self {
        edgewiki_core::Error::with_context("Authentication failed", err)
    }
}
