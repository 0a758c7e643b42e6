//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::{global_config_path, Config};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Plain environment variables honoured for compatibility, mapped to config keys
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("ORG", "devops.organization"),
    ("PROJECT", "devops.project"),
    ("PAT", "auth.personal_access_token"),
    ("AZURE_DEVOPS_PAT", "auth.personal_access_token"),
    ("AZURE_TENANT_ID", "auth.tenant_id"),
];

/// Helper to set a config override with consistent error mapping
fn set_config_override(builder: Builder, key: &str, value: String) -> Result<Builder> {
    builder
        .set_override(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key}: {e}")))
}

/// Apply the legacy variables on top of everything else
///
/// Later entries in [`LEGACY_ENV_OVERRIDES`] win, so `AZURE_DEVOPS_PAT`
/// takes precedence over `PAT`. Empty values are ignored.
pub(crate) fn apply_legacy_overrides<F>(mut builder: Builder, lookup: F) -> Result<Builder>
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in LEGACY_ENV_OVERRIDES {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            debug!("Applying {var} to {key}");
            builder = set_config_override(builder, key, value)?;
        }
    }
    Ok(builder)
}

/// `EDGEWIKI_*` variables, read from `source` instead of the process when given.
///
/// Values stay strings: numeric fields are converted during deserialization,
/// so text such as `api_version = 7.0` is never reformatted as a number.
pub(crate) fn prefixed_environment(source: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix("EDGEWIKI")
        .prefix_separator("_")
        .separator("__")
        .source(source)
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `EDGEWIKI_` and use double underscores
    /// for nested values. For example:
    /// - `EDGEWIKI_DEVOPS__PROJECT=Edge`
    /// - `EDGEWIKI_AUTH__MODE=static`
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_layers(path, prefixed_environment(None), |var| std::env::var(var).ok())
    }

    pub(crate) fn from_layers<F>(path: &Path, environment: Environment, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(environment);
        let builder = apply_legacy_overrides(builder, lookup)?;

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.edgewiki/config.toml or custom --config path)
    /// 3. Environment variables (EDGEWIKI_*)
    /// 4. ORG, PROJECT, PAT, AZURE_DEVOPS_PAT, AZURE_TENANT_ID
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
