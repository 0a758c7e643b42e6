//! Core types shared by the edgewiki crates
//!
//! - **Configuration**: layered TOML/environment configuration
//! - **Paths**: conversion between search-result paths and page paths
//! - **Models**: the records returned to MCP clients
//! - **Error handling**: unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod models;
pub mod path;

// Re-export main types for convenience
pub use config::{AuthConfig, Config, CredentialMode, DevOpsConfig};
pub use error::{Error, Result};
pub use models::{WikiPage, WikiSearchHit};
pub use path::{browse_url, normalize_page_path};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
