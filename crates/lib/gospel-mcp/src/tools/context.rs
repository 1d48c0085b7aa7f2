use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::GospelLibraryMcp;

/// Payload listing the server's tools.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the tools this server provides.".to_string(),
                "health - Returns ok when the server is running.".to_string(),
                "get_exact_scripture - Fetch a verse or verse range, e.g. \"Alma 32:27-28\"."
                    .to_string(),
                "search_scriptures_by_keyword - Reference lookup, keyword search, or a random verse for an empty query."
                    .to_string(),
                "get_random_scripture - Return one random verse.".to_string(),
                "get_conference_talk - Fetch a talk by id; pass full=true for the complete text."
                    .to_string(),
                "search_conference_talks - Search talks by query, speaker, conference, title, or from/to dates; list=\"conferences\" or list=\"speakers\" for listings."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl<C: Connection> GospelLibraryMcp<C> {
    #[tool(description = "List the tools this server provides.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
