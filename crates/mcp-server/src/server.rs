//! MCP Server implementation for edgewiki
//!
//! Exposes `search_wiki`, `get_wiki_by_path` and the `start_edge_wiki_search`
//! prompt over the rmcp stdio transport.

use crate::error::McpError;
use crate::operations::WikiOperations;
use crate::prompts;
use crate::tool::{GetWikiByPathInput, SearchWikiInput};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorData, GetPromptRequestParam, GetPromptResult,
        Implementation, ListPromptsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tracing::{info, warn};

/// MCP Server for the Edge wiki
#[derive(Clone)]
pub struct WikiMcpServer {
    tool_router: ToolRouter<Self>,
    operations: WikiOperations,
}

impl std::fmt::Debug for WikiMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiMcpServer")
            .field("operations", &self.operations)
            .finish()
    }
}

impl WikiMcpServer {
    /// Create a new MCP server instance
    pub fn new(operations: WikiOperations) -> Self {
        Self {
            tool_router: Self::tool_router(),
            operations,
        }
    }
}

#[tool_router]
impl WikiMcpServer {
    #[tool(
        name = "search_wiki",
        description = "Search the Edge wiki for pages matching keyword query. Returns a JSON array of {file_name, path, wiki_id, url}. Pass a result's path and wiki_id unchanged to get_wiki_by_path."
    )]
    async fn search_wiki(
        &self,
        Parameters(input): Parameters<SearchWikiInput>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Executing search_wiki: query={}", input.query);

        let outcome = self.operations.search_wiki(&input.query).await;
        Ok(into_tool_result(outcome, "Error searching wiki"))
    }

    #[tool(
        name = "get_wiki_by_path",
        description = "Fetch the full markdown content of an Edge wiki page. Use the path exactly as search_wiki returned it, without decoding. Returns JSON {path, url, content}."
    )]
    async fn get_wiki_by_path(
        &self,
        Parameters(input): Parameters<GetWikiByPathInput>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Executing get_wiki_by_path: path={}", input.path);

        let outcome = self
            .operations
            .get_wiki_by_path(&input.path, input.wiki_id.as_deref())
            .await;
        Ok(into_tool_result(outcome, "Error fetching wiki page"))
    }
}

#[tool_handler]
impl ServerHandler for WikiMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "edgewiki".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(prompts::SEARCH_GUIDANCE.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult {
            prompts: prompts::list(),
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        prompts::get(&request.name).ok_or_else(|| {
            ErrorData::invalid_params(format!("Unknown prompt: {}", request.name), None)
        })
    }
}

/// Serialize a successful outcome or report the failure as an `isError` result
fn into_tool_result<T: Serialize>(outcome: crate::Result<T>, prefix: &str) -> CallToolResult {
    let rendered = outcome.and_then(|value| Ok(serde_json::to_string_pretty(&value)?));
    match rendered {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => {
            warn!("{prefix}: {e}");
            CallToolResult::error(vec![Content::text(format!(
                "{prefix}: {}",
                e.to_tool_error_message()
            ))])
        }
    }
}

/// Run the MCP server with stdio transport
///
/// This is the main entry point for the `edgewiki serve` command.
/// It runs until the client disconnects.
pub async fn run_mcp_server(operations: WikiOperations) -> crate::Result<()> {
    info!("Starting edgewiki MCP server");

    let server = WikiMcpServer::new(operations);

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| McpError::Transport(e.to_string()))?;

    info!("MCP server started, waiting for client requests");

    service
        .waiting()
        .await
        .map_err(|e| McpError::Transport(e.to_string()))?;

    info!("MCP server shutting down");
    Ok(())
}
