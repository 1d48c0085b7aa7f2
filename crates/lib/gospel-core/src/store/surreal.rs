use std::{
    error::Error,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use gospel_store::models::Corpus;
use gospel_store::schema::{TABLE_SCRIPTURE, TABLE_TALK};
use serde::de::DeserializeOwned;
use surrealdb::{Connection, Surreal};
use tracing::debug;

use crate::query::{QueryAttempt, first_non_empty};

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-side adapter over the scripture and talk tables.
pub struct SurrealLibraryStore<C: Connection> {
    db: Arc<Surreal<C>>,
    issued: Arc<AtomicU64>,
}

impl<C: Connection> Clone for SurrealLibraryStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            issued: self.issued.clone(),
        }
    }
}

impl<C: Connection> SurrealLibraryStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self::from_arc(Arc::new(db))
    }

    #[must_use]
    pub fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self {
            db,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of query attempts executed through this store and its clones.
    #[must_use]
    pub fn queries_issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Executes a single attempt and decodes its first statement result.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails or rows cannot be decoded.
    pub async fn fetch<T: DeserializeOwned>(&self, attempt: &QueryAttempt) -> StoreResult<Vec<T>> {
        self.issued.fetch_add(1, Ordering::Relaxed);
        debug!(attempt = attempt.label(), binds = attempt.binds().len(), "executing query attempt");

        let mut request = self.db.query(attempt.statement().to_string());
        for (name, value) in attempt.binds() {
            request = request.bind((name.clone(), value.clone()));
        }
        let mut response = request.await?;
        let records: Vec<T> = response.take(0)?;
        Ok(records)
    }

    /// Runs `attempts` in order and returns the first non-empty row set.
    ///
    /// # Errors
    /// Returns `StoreError` from the first attempt that fails.
    pub async fn first_non_empty<T: DeserializeOwned>(
        &self,
        attempts: &[QueryAttempt],
    ) -> StoreResult<Vec<T>> {
        first_non_empty(attempts, |attempt| self.fetch::<T>(attempt)).await
    }

    /// Seeds the scripture and talk tables from a corpus document.
    ///
    /// # Errors
    /// Returns `StoreError` if a write fails.
    pub async fn load_corpus(&self, corpus: Corpus) -> StoreResult<()> {
        let Corpus { scriptures, talks } = corpus;
        if let Some(talk) = talks.iter().find(|talk| talk.speaker.trim().is_empty()) {
            return Err(StoreError::InvalidInput(format!(
                "talk {} has no speaker",
                talk.talk_id
            )));
        }
        if !scriptures.is_empty() {
            insert_rows(&self.db, TABLE_SCRIPTURE, scriptures).await?;
        }
        if !talks.is_empty() {
            insert_rows(&self.db, TABLE_TALK, talks).await?;
        }
        Ok(())
    }
}

async fn insert_rows<C, T>(db: &Surreal<C>, table: &'static str, rows: Vec<T>) -> StoreResult<()>
where
    C: Connection,
    T: serde::Serialize + 'static,
{
    let count = rows.len();
    let query = format!("INSERT INTO {table} $rows;");
    db.query(query).bind(("rows", rows)).await?.check()?;
    debug!(table, count, "seeded rows");
    Ok(())
}
