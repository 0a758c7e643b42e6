//! MCP Server for the Edge wiki
//!
//! Provides a Model Context Protocol server with `search_wiki` and
//! `get_wiki_by_path` tools backed by the Azure DevOps wiki APIs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod error;
mod operations;
mod prompts;
mod server;
mod tool;

pub use error::{McpError, Result};
pub use operations::WikiOperations;
pub use server::{run_mcp_server, WikiMcpServer};
