//! Configuration module for edgewiki
//!
//! Configuration is layered: hardcoded defaults, an optional TOML file,
//! `EDGEWIKI_*` environment variables, and finally the plain variables
//! (`ORG`, `PROJECT`, `AZURE_DEVOPS_PAT`) that earlier deployments relied on.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

pub use defaults::{DEFAULT_ORGANIZATION, DEFAULT_PROJECT, DEVOPS_RESOURCE_ID};

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.edgewiki/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
    Ok(home_dir.join(".edgewiki").join("config.toml"))
}

/// Where the bearer credential for Azure DevOps comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    /// Tokens acquired and refreshed through the credential chain (default)
    #[default]
    Managed,
    /// A personal access token read from configuration
    Static,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Azure DevOps organization and API settings
    #[serde(default)]
    pub devops: DevOpsConfig,

    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Azure DevOps connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevOpsConfig {
    /// Organization name, as in `https://dev.azure.com/{organization}`
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Project whose wikis are searched
    #[serde(default = "default_project")]
    pub project: String,

    /// Base URL for the core REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for the search REST API
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// REST API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Maximum number of wiki search hits requested
    #[serde(default = "default_search_top")]
    pub search_top: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl DevOpsConfig {
    /// URL of the organization, e.g. `https://dev.azure.com/microsoft`
    pub fn organization_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.organization
        )
    }

    /// URL of the organization on the search host
    pub fn search_organization_url(&self) -> String {
        format!(
            "{}/{}",
            self.search_base_url.trim_end_matches('/'),
            self.organization
        )
    }
}

/// Authentication settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Credential mode: "managed" (default) or "static"
    #[serde(default)]
    pub mode: CredentialMode,

    /// Personal access token used in static mode (or AZURE_DEVOPS_PAT env var)
    #[serde(default)]
    pub personal_access_token: Option<String>,

    /// Resource the managed token is requested for
    #[serde(default = "default_resource_id")]
    pub resource_id: String,

    /// Entra ID tenant used for the browser login
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,

    /// Public client id used for the browser login
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Identity provider host
    #[serde(default = "default_authority_host")]
    pub authority_host: String,

    /// How long to wait for the browser login to complete
    #[serde(default = "default_browser_timeout_secs")]
    pub browser_timeout_secs: u64,

    /// Azure CLI executable
    #[serde(default = "default_az_command")]
    pub az_command: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field(
                "personal_access_token",
                &self
                    .personal_access_token
                    .as_ref()
                    .map(|_| "***REDACTED***"),
            )
            .field("resource_id", &self.resource_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("authority_host", &self.authority_host)
            .field("browser_timeout_secs", &self.browser_timeout_secs)
            .field("az_command", &self.az_command)
            .finish()
    }
}

impl Default for DevOpsConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            project: default_project(),
            base_url: default_base_url(),
            search_base_url: default_search_base_url(),
            api_version: default_api_version(),
            search_top: default_search_top(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: CredentialMode::default(),
            personal_access_token: None,
            resource_id: default_resource_id(),
            tenant_id: default_tenant_id(),
            client_id: default_client_id(),
            authority_host: default_authority_host(),
            browser_timeout_secs: default_browser_timeout_secs(),
            az_command: default_az_command(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.devops.organization.trim().is_empty() {
            return Err(Error::config(
                "devops.organization must not be empty".to_string(),
            ));
        }

        if self.devops.project.trim().is_empty() {
            return Err(Error::config("devops.project must not be empty".to_string()));
        }

        if self.devops.search_top == 0 || self.devops.search_top > MAX_SEARCH_TOP {
            return Err(Error::config(format!(
                "devops.search_top must be between 1 and {MAX_SEARCH_TOP} (got {})",
                self.devops.search_top
            )));
        }

        if self.devops.request_timeout_secs == 0 {
            return Err(Error::config(
                "devops.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.auth.mode == CredentialMode::Static
            && self
                .auth
                .personal_access_token
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .is_empty()
        {
            return Err(Error::config(
                "auth.mode is \"static\" but no personal access token is configured. \
                Set auth.personal_access_token or AZURE_DEVOPS_PAT"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
