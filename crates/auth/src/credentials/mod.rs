//! Credential sources and the chain that tries them in order

mod azure_cli;
mod browser;

pub use azure_cli::AzureCliCredential;
pub use browser::{BrowserLoginSettings, InteractiveBrowserCredential};

use crate::error::{AuthError, Result};
use crate::token::AccessToken;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that can produce an access token for a resource
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Short human-readable name used in logs and errors
    fn name(&self) -> &str;

    /// Acquire a token for `resource`
    async fn get_token(&self, resource: &str) -> Result<AccessToken>;
}

/// Tries each credential in order and returns the first token obtained
pub struct ChainedTokenCredential {
    sources: Vec<Arc<dyn TokenCredential>>,
}

impl ChainedTokenCredential {
    pub fn new(sources: Vec<Arc<dyn TokenCredential>>) -> Self {
        Self { sources }
    }

    /// Names of the credentials in priority order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl TokenCredential for ChainedTokenCredential {
    fn name(&self) -> &str {
        "ChainedTokenCredential"
    }

    async fn get_token(&self, resource: &str) -> Result<AccessToken> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            debug!("Trying {}", source.name());
            match source.get_token(resource).await {
                Ok(token) => {
                    debug!("{} acquired a token", source.name());
                    return Ok(token);
                }
                Err(e) => {
                    warn!("{} failed: {e}", source.name());
                    failures.push(format!("{}: {e}", source.name()));
                }
            }
        }

        Err(AuthError::ChainExhausted(failures))
    }
}
