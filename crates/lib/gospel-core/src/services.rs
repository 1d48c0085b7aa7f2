use std::error::Error;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use surrealdb::{Connection, Surreal};
use tokio::sync::OnceCell;
use tracing::info;

use crate::control::LibraryControlPlane;
use crate::planner::LibraryLimits;
use crate::store::SurrealLibraryStore;

pub type BuildHandleFuture<C> = BoxFuture<'static, Result<Arc<LibraryHandle<C>>, ConnectionError>>;
pub type BuildHandleFn<C> = Arc<dyn Fn() -> BuildHandleFuture<C> + Send + Sync + 'static>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    BuildFailed(String),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildFailed(message) => write!(f, "failed to open library store: {message}"),
        }
    }
}

impl Error for ConnectionError {}

/// Shared service handle over the library database.
pub struct LibraryHandle<C: Connection> {
    store: SurrealLibraryStore<C>,
    control: LibraryControlPlane<C>,
}

impl<C: Connection> Clone for LibraryHandle<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            control: self.control.clone(),
        }
    }
}

impl<C: Connection> LibraryHandle<C> {
    pub fn new(db: Arc<Surreal<C>>, limits: LibraryLimits) -> Self {
        let store = SurrealLibraryStore::from_arc(db);
        let control = LibraryControlPlane::with_store(store.clone(), limits);
        Self { store, control }
    }

    pub fn from_surreal(db: Surreal<C>, limits: LibraryLimits) -> Self {
        Self::new(Arc::new(db), limits)
    }

    pub fn store(&self) -> SurrealLibraryStore<C> {
        self.store.clone()
    }

    pub fn control(&self) -> LibraryControlPlane<C> {
        self.control.clone()
    }
}

/// Owns the process-wide library handle and builds it at most once.
///
/// Concurrent callers of `acquire` share a single in-flight build. A failed
/// build leaves the manager uninitialized so the next call retries.
pub struct ConnectionManager<C: Connection> {
    handle: OnceCell<Arc<LibraryHandle<C>>>,
    build_handle: BuildHandleFn<C>,
}

impl<C: Connection> ConnectionManager<C> {
    pub fn new(build_handle: BuildHandleFn<C>) -> Self {
        Self {
            handle: OnceCell::new(),
            build_handle,
        }
    }

    /// Creates a manager around an already-open handle.
    pub fn ready(handle: LibraryHandle<C>) -> Self {
        let build: BuildHandleFn<C> = Arc::new(|| -> BuildHandleFuture<C> {
            Box::pin(async {
                Err(ConnectionError::BuildFailed(
                    "pre-initialized handle was lost".to_string(),
                ))
            })
        });
        Self {
            handle: OnceCell::new_with(Some(Arc::new(handle))),
            build_handle: build,
        }
    }

    /// Opens the connection if it is not open yet. Idempotent.
    ///
    /// # Errors
    /// Returns `ConnectionError` if building the handle fails.
    pub async fn init(&self) -> Result<(), ConnectionError> {
        self.acquire().await.map(|_| ())
    }

    /// Returns the shared handle, initializing it on first use.
    ///
    /// # Errors
    /// Returns `ConnectionError` if building the handle fails.
    pub async fn acquire(&self) -> Result<Arc<LibraryHandle<C>>, ConnectionError> {
        let build_handle = self.build_handle.clone();
        let handle = self
            .handle
            .get_or_try_init(|| async move {
                let handle = (build_handle)().await?;
                info!("library store connection initialized");
                Ok(handle)
            })
            .await?;
        Ok(handle.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }
}
