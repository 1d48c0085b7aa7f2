use gospel_core::format::FormattedContent;
use rmcp::model::{CallToolResult, Content};

/// Every outcome, including errors, is a successful result of text blocks.
pub(crate) fn tool_result(content: FormattedContent) -> CallToolResult {
    CallToolResult::success(content.blocks.into_iter().map(Content::text).collect())
}
