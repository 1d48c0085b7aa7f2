//! MCP tool modules.
//!
//! Tools are grouped by corpus: scripture lookup and search, conference talk
//! lookup and listing, and contextual help.

pub mod scripture;
pub mod talks;
mod context;
