//! edgewiki CLI - Edge wiki search over MCP
//!
//! This binary runs the MCP stdio server and offers one-shot commands for
//! trying searches and credentials from a terminal.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use edgewiki::{default_log_filter, App, Config};
use edgewiki_devops::CredentialSource;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "edgewiki")]
#[command(about = "Search the Microsoft Edge wiki on Azure DevOps over MCP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (default)
    Serve,
    /// Run one wiki search and print the hits
    Search {
        /// Keyword query
        query: String,
    },
    /// Fetch one wiki page and print it
    Page {
        /// Page path as returned by search
        path: String,
        /// Wiki identifier; defaults to the project wiki
        #[arg(long)]
        wiki_id: Option<String>,
    },
    /// Check that an access token can be acquired
    Token,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let app = load_app(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(app).await,
        Commands::Search { query } => {
            let hits = app
                .operations
                .search_wiki(&query)
                .await
                .map_err(|e| anyhow!("Error searching wiki: {}", e.to_tool_error_message()))?;
            print_json(&hits)
        }
        Commands::Page { path, wiki_id } => {
            let page = app
                .operations
                .get_wiki_by_path(&path, wiki_id.as_deref())
                .await
                .map_err(|e| {
                    anyhow!("Error fetching wiki page: {}", e.to_tool_error_message())
                })?;
            print_json(&page)
        }
        Commands::Token => token_status(&app.credentials).await,
    }
}

/// Initialize logging system
///
/// Logs go to stderr; stdout belongs to the MCP transport.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}

fn load_app(config_path: Option<&Path>) -> Result<App> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    info!(
        "Using organization '{}' project '{}'",
        config.devops.organization, config.devops.project
    );
    App::from_config(&config)
}

/// Start the MCP server
async fn serve(app: App) -> Result<()> {
    if let CredentialSource::Managed(manager) = &app.credentials {
        if !manager.warm_up().await {
            warn!("Starting without a valid token; tool calls will retry authentication");
        }
    }

    edgewiki_mcp_server::run_mcp_server(app.operations)
        .await
        .context("MCP server failed")?;
    Ok(())
}

async fn token_status(credentials: &CredentialSource) -> Result<()> {
    match credentials {
        CredentialSource::Managed(manager) => match manager.authenticate().await {
            Some(token) => {
                println!(
                    "Token acquired for {}; expires at {}",
                    manager.resource(),
                    token.expires_on.to_rfc3339()
                );
                Ok(())
            }
            None => bail!("Could not acquire a token. Run 'az login' and try again."),
        },
        CredentialSource::Static(Some(_)) => {
            println!("Using a static personal access token");
            Ok(())
        }
        CredentialSource::Static(None) => bail!("No personal access token configured"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
