//! TokenManager driven through a credential chain

use async_trait::async_trait;
use chrono::{Duration, Utc};
use edgewiki_auth::{AccessToken, AuthError, ChainedTokenCredential, TokenCredential, TokenManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const RESOURCE: &str = "499b84ac-1321-427f-aa17-267ca6975798";

/// Stands in for a signed-out Azure CLI
struct SignedOut;

#[async_trait]
impl TokenCredential for SignedOut {
    fn name(&self) -> &str {
        "AzureCliCredential"
    }

    async fn get_token(&self, _resource: &str) -> edgewiki_auth::Result<AccessToken> {
        Err(AuthError::unavailable(
            "AzureCliCredential",
            "Please run 'az login' to set up an account",
        ))
    }
}

/// Issues numbered tokens with a fixed lifetime
struct Issuer {
    lifetime: Duration,
    issued: AtomicUsize,
}

impl Issuer {
    fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            issued: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TokenCredential for Issuer {
    fn name(&self) -> &str {
        "InteractiveBrowserCredential"
    }

    async fn get_token(&self, resource: &str) -> edgewiki_auth::Result<AccessToken> {
        assert_eq!(resource, RESOURCE);
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessToken::new(format!("token-{n}"), Utc::now() + self.lifetime))
    }
}

fn manager_with(issuer: Arc<Issuer>) -> TokenManager {
    let chain = ChainedTokenCredential::new(vec![
        Arc::new(SignedOut) as Arc<dyn TokenCredential>,
        issuer as Arc<dyn TokenCredential>,
    ]);
    TokenManager::new(RESOURCE, Arc::new(chain))
}

#[tokio::test]
async fn test_falls_back_to_second_source_and_caches() {
    let issuer = Arc::new(Issuer::new(Duration::hours(1)));
    let manager = manager_with(issuer.clone());

    assert!(!manager.is_token_valid());
    assert_eq!(manager.get_access_token().await, "token-1");
    assert_eq!(manager.get_access_token().await, "token-1");
    assert!(manager.is_token_valid());
    assert_eq!(issuer.issued.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expired_tokens_are_never_returned() {
    let issuer = Arc::new(Issuer::new(Duration::seconds(-5)));
    let manager = manager_with(issuer);

    assert_eq!(manager.get_access_token().await, "");
    assert!(!manager.is_token_valid());
    assert!(manager.expires_on().is_none());
}

#[tokio::test]
async fn test_exhausted_chain_yields_empty_token() {
    let chain = ChainedTokenCredential::new(vec![Arc::new(SignedOut) as Arc<dyn TokenCredential>]);
    let manager = TokenManager::new(RESOURCE, Arc::new(chain));

    assert_eq!(manager.get_access_token().await, "");
    assert!(!manager.warm_up().await);
}
