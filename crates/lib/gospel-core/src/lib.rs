//! Core engine for the gospel library MCP server.
//!
//! This crate turns loosely formatted scripture references, speaker names, and
//! conference identifiers into parameterized store queries, runs them with
//! ordered fallback, and renders the rows as text content. It also provides the
//! `SurrealDB` backed store and the lazily initialized connection manager.

pub mod books;
pub mod control;
pub mod format;
pub mod patterns;
pub mod planner;
pub mod query;
pub mod reference;
pub mod services;
pub mod store;
