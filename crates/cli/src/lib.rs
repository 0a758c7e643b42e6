//! Library interface for the edgewiki CLI
//!
//! Wiring shared by the binary and its integration tests.

use anyhow::{Context, Result};
use edgewiki_devops::{ConnectionFactory, CredentialSource, DevOpsWikiApi};
use edgewiki_mcp_server::WikiOperations;
use std::sync::Arc;
use tracing::debug;

pub use edgewiki_core::Config;

/// Everything a command needs, built from one validated configuration
#[derive(Debug)]
pub struct App {
    pub operations: WikiOperations,
    pub credentials: CredentialSource,
}

impl App {
    /// Validate `config` and assemble the credential source and wiki client
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let credentials = CredentialSource::from_config(&config.auth)
            .context("Failed to set up credentials")?;
        debug!("Credential source: {credentials:?}");

        let factory = ConnectionFactory::new(config.devops.clone(), credentials.clone())
            .context("Failed to create Azure DevOps client")?;
        let operations = WikiOperations::new(
            Arc::new(DevOpsWikiApi::new(factory)),
            config.devops.project.clone(),
        );

        Ok(Self {
            operations,
            credentials,
        })
    }
}

/// Default `tracing` filter when `RUST_LOG` is unset
pub fn default_log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["edgewiki", "edgewiki_core", "edgewiki_auth", "edgewiki_devops", "edgewiki_mcp_server"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
