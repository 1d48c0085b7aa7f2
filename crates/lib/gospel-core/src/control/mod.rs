//! Control plane exposing the library's logical operations.
//!
//! Every public operation returns `FormattedContent`. Input problems, empty
//! results, and store failures all degrade to text blocks so a tool caller
//! always receives a result.

use std::{error::Error, fmt};

use surrealdb::{Connection, Surreal};
use tracing::error;

use crate::format::FormattedContent;
use crate::planner::{LibraryLimits, QueryPlanner};
use crate::store::{StoreError, SurrealLibraryStore};

pub mod scripture;
pub mod talks;

pub use talks::summarize_conferences;

#[derive(Debug)]
pub enum ControlError {
    Store(StoreError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

pub struct LibraryControlPlane<C: Connection> {
    store: SurrealLibraryStore<C>,
    planner: QueryPlanner,
}

impl<C: Connection> Clone for LibraryControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            planner: self.planner,
        }
    }
}

impl<C: Connection> LibraryControlPlane<C> {
    pub fn new(db: Surreal<C>, limits: LibraryLimits) -> Self {
        Self::with_store(SurrealLibraryStore::new(db), limits)
    }

    pub const fn with_store(store: SurrealLibraryStore<C>, limits: LibraryLimits) -> Self {
        Self {
            store,
            planner: QueryPlanner::new(limits),
        }
    }

    pub const fn store(&self) -> &SurrealLibraryStore<C> {
        &self.store
    }

    pub const fn limits(&self) -> &LibraryLimits {
        self.planner.limits()
    }
}

/// Converts a failed operation into an `Error:` block and logs it.
fn settle(operation: &'static str, result: Result<FormattedContent, ControlError>) -> FormattedContent {
    result.unwrap_or_else(|err| {
        error!(operation, error = %err, "library operation failed");
        FormattedContent::error(err)
    })
}
