//! Azure DevOps REST client for wiki search and page retrieval
//!
//! Connections authenticate either with tokens from an
//! [`edgewiki_auth::TokenManager`] or with a configured personal access token.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod api;
mod connection;
pub mod error;
pub mod models;

pub use api::{DevOpsWikiApi, WikiApi};
pub use connection::{ConnectionFactory, CredentialSource, DevOpsConnection};
pub use error::{DevOpsError, Result};
pub use models::{Wiki, WikiPageResponse, WikiSearchResult, WikiType};
