//! Cached access token with refresh on expiry

use crate::credentials::{
    AzureCliCredential, BrowserLoginSettings, ChainedTokenCredential,
    InteractiveBrowserCredential, TokenCredential,
};
use crate::error::Result;
use crate::token::AccessToken;
use chrono::{DateTime, Utc};
use edgewiki_core::AuthConfig;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Owns the process's single cached token for one resource.
///
/// The lock is held across a refresh, so callers racing on an expired token
/// trigger one sign-in and all see its result.
pub struct TokenManager {
    resource: String,
    credential: Arc<dyn TokenCredential>,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("resource", &self.resource)
            .field("credential", &self.credential.name())
            .finish()
    }
}

impl TokenManager {
    pub fn new(resource: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            resource: resource.into(),
            credential,
            token: Mutex::new(None),
        }
    }

    /// Azure CLI first, then the interactive browser login
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let cli = AzureCliCredential::new(config.az_command.clone(), Some(config.tenant_id.clone()));
        let browser = InteractiveBrowserCredential::new(BrowserLoginSettings {
            authority_host: config.authority_host.clone(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            timeout_secs: config.browser_timeout_secs,
        })?;
        let sources: Vec<Arc<dyn TokenCredential>> = vec![Arc::new(cli), Arc::new(browser)];
        let chain = ChainedTokenCredential::new(sources);
        Ok(Self::new(config.resource_id.clone(), Arc::new(chain)))
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Acquire a fresh token and cache it.
    ///
    /// Failures are logged and reported as `None`; retrying is up to the caller.
    pub async fn authenticate(&self) -> Option<AccessToken> {
        let mut slot = self.token.lock().await;
        self.refresh(&mut slot).await
    }

    /// Value of the cached token, refreshing it first if absent or expired.
    ///
    /// Returns an empty string when no valid token can be obtained.
    pub async fn get_access_token(&self) -> String {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_valid()) {
            return token.token.clone();
        }
        self.refresh(&mut slot)
            .await
            .map(|t| t.token)
            .unwrap_or_default()
    }

    /// True if a token is cached and has not expired.
    ///
    /// Never waits: while a refresh holds the slot there is no usable token yet.
    pub fn is_token_valid(&self) -> bool {
        self.token
            .try_lock()
            .map(|slot| slot.as_ref().is_some_and(AccessToken::is_valid))
            .unwrap_or(false)
    }

    /// Expiry of the cached token, if any; `None` while a refresh is in flight
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.token
            .try_lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|t| t.expires_on))
    }

    /// Sign in eagerly so the first tool call does not block on a login
    pub async fn warm_up(&self) -> bool {
        if self.is_token_valid() {
            return true;
        }
        self.authenticate().await.is_some()
    }

    async fn refresh(&self, slot: &mut Option<AccessToken>) -> Option<AccessToken> {
        info!("Attempting authentication with {}...", self.credential.name());

        // A stale token must never be handed out again
        *slot = None;

        match self.credential.get_token(&self.resource).await {
            Ok(token) if token.is_valid() => {
                info!(
                    "Successfully authenticated, token expires at {}",
                    token.expires_on
                );
                *slot = Some(token.clone());
                Some(token)
            }
            Ok(token) => {
                warn!(
                    "Credential returned a token that already expired at {}",
                    token.expires_on
                );
                None
            }
            Err(e) => {
                error!("Authentication failed: {e}");
                info!("Make sure you're logged in with 'az login' or allow browser authentication");
                None
            }
        }
    }
}
