//! Access tokens for Azure DevOps
//!
//! Provides the [`TokenManager`], which caches one bearer token for the Azure
//! DevOps resource and refreshes it through an ordered chain of credential
//! sources: the signed-in Azure CLI first, an interactive browser login second.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod credentials;
pub mod error;
mod manager;
mod token;

pub use credentials::{
    AzureCliCredential, BrowserLoginSettings, ChainedTokenCredential,
    InteractiveBrowserCredential, TokenCredential,
};
pub use error::{AuthError, Result};
pub use manager::TokenManager;
pub use token::AccessToken;
