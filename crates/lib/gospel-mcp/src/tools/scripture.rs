use gospel_core::planner::ScriptureSearchRequest;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::GospelLibraryMcp;

/// Parameters for fetching an exact verse or range.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetExactScriptureParams {
    /// Scripture reference such as "John 3:16" or "Alma 32:27-28".
    pub reference: String,
}

/// Parameters for the scripture search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchScripturesParams {
    /// Keyword, phrase, or reference-shaped text.
    pub query: Option<String>,
    /// Explicit reference; takes precedence over `query` when it parses.
    pub reference: Option<String>,
    /// Maximum verses returned by a keyword search.
    pub limit: Option<usize>,
}

impl From<SearchScripturesParams> for ScriptureSearchRequest {
    fn from(params: SearchScripturesParams) -> Self {
        Self {
            query: params.query,
            reference: params.reference,
            limit: params.limit,
        }
    }
}

#[tool_router(router = tool_router_scripture, vis = "pub")]
impl<C: Connection> GospelLibraryMcp<C> {
    #[tool(description = "Fetch an exact scripture verse or contiguous verse range by reference.")]
    pub(crate) async fn get_exact_scripture(
        &self,
        Parameters(params): Parameters<GetExactScriptureParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self
            .run("get_exact_scripture", |control| async move {
                control.get_passage(&params.reference).await
            })
            .await)
    }

    #[tool(
        description = "Search scriptures. A reference is looked up directly, an empty query returns a random verse, otherwise a keyword search runs."
    )]
    pub(crate) async fn search_scriptures_by_keyword(
        &self,
        Parameters(params): Parameters<SearchScripturesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ScriptureSearchRequest::from(params);
        Ok(self
            .run("search_scriptures_by_keyword", |control| async move {
                control.search_scriptures(&request).await
            })
            .await)
    }

    #[tool(description = "Return one random scripture verse.")]
    pub(crate) async fn get_random_scripture(&self) -> Result<CallToolResult, ErrorData> {
        Ok(self
            .run("get_random_scripture", |control| async move {
                control.random_scripture().await
            })
            .await)
    }
}
