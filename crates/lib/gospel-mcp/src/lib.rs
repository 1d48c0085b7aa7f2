//! MCP server for the gospel library.
//!
//! This crate wires the library control plane into rmcp tool handlers and
//! exposes the scripture and conference-talk tools.

mod helpers;
mod tools;
pub mod server;

use std::future::Future;
use std::sync::Arc;

use gospel_core::control::LibraryControlPlane;
use gospel_core::format::FormattedContent;
use gospel_core::services::ConnectionManager;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use surrealdb::Connection;
use tracing::{debug, error};

const SERVER_INSTRUCTIONS: &str = r#"gospel-library provides read-only lookup and search over the standard works and General Conference talks.

Scriptures:
- `get_exact_scripture` fetches a verse or a contiguous range, e.g. "John 3:16", "1 Nephi 3:7", "Alma 32:27-28".
  Book abbreviations such as "1 Ne.", "D&C", or "Jn" are accepted.
- `search_scriptures_by_keyword` takes `reference` or `query`. A reference-shaped query is looked up directly,
  an empty query returns a random verse, anything else is a case-insensitive keyword search.
- `get_random_scripture` returns one random verse.

Conference talks:
- `get_conference_talk` fetches a talk by id. The body is excerpted unless `full` is true.
- `search_conference_talks` accepts `id`, `query` (text search), `speaker`, `conference`, `title`,
  `from`/`to` (date window), `limit`, `offset`, and `list` ("conferences" or "speakers").
  Conferences can be given as "2023-04", "Oct 2022", or "April 2023 General Conference".
  A search with a single match returns the full talk; otherwise summaries carry `[ID: n]` for follow-up.

Notes:
- Every tool returns text. Empty results and input problems are explained in the text rather than as errors.
- `help` lists the tools. `health` returns `ok`."#;

/// MCP server wrapper around the connection manager and tool routers.
#[derive(Clone)]
pub struct GospelLibraryMcp<C: Connection> {
    tool_router: ToolRouter<Self>,
    connections: Arc<ConnectionManager<C>>,
}

impl<C: Connection> GospelLibraryMcp<C> {
    /// Creates a new server owning the connection manager.
    #[must_use]
    pub fn new(connections: ConnectionManager<C>) -> Self {
        Self::with_connections(Arc::new(connections))
    }

    /// Creates a new server using a shared connection manager.
    #[must_use]
    pub fn with_connections(connections: Arc<ConnectionManager<C>>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_scripture()
            + Self::tool_router_talks()
            + Self::tool_router_context();
        Self {
            tool_router,
            connections,
        }
    }

    /// Runs `operation` against the control plane and renders its blocks.
    ///
    /// A connection failure short-circuits into a `DB init error:` block.
    pub(crate) async fn run<F, Fut>(&self, tool: &'static str, operation: F) -> CallToolResult
    where
        F: FnOnce(LibraryControlPlane<C>) -> Fut + Send,
        Fut: Future<Output = FormattedContent> + Send,
    {
        debug!(tool, "tool invoked");
        let content = match self.connections.acquire().await {
            Ok(handle) => operation(handle.control()).await,
            Err(err) => {
                error!(tool, error = %err, "library store unavailable");
                FormattedContent::init_error(err)
            }
        };
        helpers::tool_result(content)
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<C: Connection> GospelLibraryMcp<C> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<C: Connection> ServerHandler for GospelLibraryMcp<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
