use std::path::Path;
use std::sync::Arc;

use gospel_core::services::{
    BuildHandleFn,
    BuildHandleFuture,
    ConnectionError,
    ConnectionManager,
    LibraryHandle,
};
use gospel_store::models::Corpus;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::config::GospelConfig;

/// Builds a manager that opens the configured store on first use and seeds
/// it from the corpus file when one is configured.
pub fn build_connections(config: &GospelConfig) -> ConnectionManager<Any> {
    let build_config = config.clone();
    let build: BuildHandleFn<Any> = Arc::new(move || -> BuildHandleFuture<Any> {
        let config = build_config.clone();
        Box::pin(async move {
            let db = connect(config.db_endpoint())
                .await
                .map_err(map_build_error)?;

            if let (Some(username), Some(password)) =
                (config.db_username.as_ref(), config.db_password.as_ref())
            {
                db.signin(Root {
                    username: username.as_str(),
                    password: password.as_str(),
                })
                .await
                .map_err(map_build_error)?;
            }

            db.use_ns(&config.db_namespace)
                .use_db(&config.db_name)
                .await
                .map_err(map_build_error)?;
            info!(
                endpoint = config.db_endpoint(),
                namespace = %config.db_namespace,
                database = %config.db_name,
                "connected to library store"
            );

            let handle = LibraryHandle::from_surreal(db, config.limits);
            if let Some(path) = config.corpus_path.as_deref() {
                let corpus = read_corpus(path).await?;
                let (scriptures, talks) = (corpus.scriptures.len(), corpus.talks.len());
                handle
                    .store()
                    .load_corpus(corpus)
                    .await
                    .map_err(map_build_error)?;
                info!(path = %path.display(), scriptures, talks, "seeded corpus");
            }
            Ok(Arc::new(handle))
        })
    });

    ConnectionManager::new(build)
}

async fn read_corpus(path: &Path) -> Result<Corpus, ConnectionError> {
    let json = tokio::fs::read_to_string(path).await.map_err(|err| {
        ConnectionError::BuildFailed(format!("failed to read corpus {}: {err}", path.display()))
    })?;
    Corpus::from_json(&json).map_err(|err| {
        ConnectionError::BuildFailed(format!("failed to parse corpus {}: {err}", path.display()))
    })
}

fn map_build_error(err: impl std::fmt::Display) -> ConnectionError {
    ConnectionError::BuildFailed(err.to_string())
}
