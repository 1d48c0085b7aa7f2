//! Record types and schema helpers for the gospel library corpora.
//!
//! This crate defines the rows returned by the data store for every query
//! shape, plus the seed document used to populate an embedded store.

pub mod models;
pub mod schema;

pub use models::*;
