use gospel_core::planner::TalkSearchRequest;
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

/// Parameters for fetching a talk by id.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetConferenceTalkParams {
    pub id: i64,
    /// Return the complete text instead of an excerpt.
    pub full: Option<bool>,
}

/// Parameters for the talk search and listing tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchConferenceTalksParams {
    pub id: Option<i64>,
    /// Text searched in the talk body.
    pub query: Option<String>,
    pub speaker: Option<String>,
    /// Conference such as "April 2023", "2023-04", or "Oct 2022".
    pub conference: Option<String>,
    pub title: Option<String>,
    /// Earliest talk date, e.g. "2022-10-01".
    pub from: Option<String>,
    /// Latest talk date, e.g. "2023-04-30".
    pub to: Option<String>,
    /// "conferences" or "speakers" to list instead of search.
    pub list: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub full: Option<bool>,
}

impl From<SearchConferenceTalksParams> for TalkSearchRequest {
    fn from(params: SearchConferenceTalksParams) -> Self {
        Self {
            id: params.id,
            query: params.query,
            speaker: params.speaker,
            conference: params.conference,
            title: params.title,
            from: params.from,
            to: params.to,
            list: params.list,
            limit: params.limit,
            offset: params.offset,
            full: params.full,
        }
    }
}

#[tool_router(router = tool_router_talks, vis = "pub")]
impl<C: Connection> GospelLibraryMcp<C> {
    #[tool(description = "Fetch a General Conference talk by id. The text is excerpted unless full is true.")]
    pub(crate) async fn get_conference_talk(
        &self,
        Parameters(params): Parameters<GetConferenceTalkParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let GetConferenceTalkParams { id, full } = params;
        Ok(self
            .run("get_conference_talk", |control| async move {
                control.get_talk(id, full.unwrap_or(false)).await
            })
            .await)
    }

    #[tool(
        description = "Search General Conference talks by text, speaker, conference, title, or date window (from/to), or list conferences and speakers."
    )]
    pub(crate) async fn search_conference_talks(
        &self,
        Parameters(params): Parameters<SearchConferenceTalksParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = TalkSearchRequest::from(params);
        Ok(self
            .run("search_conference_talks", |control| async move {
                control.search_talks(&request).await
            })
            .await)
    }
}
