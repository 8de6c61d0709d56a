//! Candidate Store: pluggable persistence for parsed resumes.
//!
//! `AppState` holds an `Arc<dyn CandidateStore>`, chosen at startup:
//! `PgCandidateStore` when `DATABASE_URL` is set, `MemoryCandidateStore` otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{Candidate, ParsedResume};

pub use memory::MemoryCandidateStore;
pub use postgres::PgCandidateStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Candidate {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for candidates. Records are immutable once stored.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Persists a parsed record under a freshly allocated id.
    /// Concurrent callers always receive distinct ids.
    async fn put(&self, parsed: ParsedResume) -> Result<Candidate, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Candidate, StoreError>;

    /// Lazily streams every candidate in creation order. Each call starts over.
    fn list(&self) -> BoxStream<'_, Result<Candidate, StoreError>>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Short backend label for logs and health output.
    fn backend(&self) -> &'static str;
}
