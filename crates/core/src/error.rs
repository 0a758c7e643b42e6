use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced across crate boundaries.
///
/// Each backend crate keeps its own detailed error enum and folds into
/// this one when the caller only needs a message.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to determine home directory")]
    HomeDirUnavailable,

    /// A backend failure with a short description of the step that failed
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_with_context_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = Error::with_context("Azure DevOps request failed", io);
        assert_eq!(err.to_string(), "Azure DevOps request failed: timed out");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_message() {
        let err = Error::config("devops.project must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: devops.project must not be empty"
        );
    }
}
