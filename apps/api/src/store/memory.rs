use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{CandidateStore, StoreError};
use crate::models::candidate::{Candidate, ParsedResume};

/// Process-local store. Contents are lost on restart; used when no database
/// is configured and in tests.
#[derive(Default)]
pub struct MemoryCandidateStore {
    candidates: RwLock<Vec<Candidate>>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn put(&self, parsed: ParsedResume) -> Result<Candidate, StoreError> {
        let mut candidates = self.candidates.write();

        // Allocation and insertion share the write lock, so the uniqueness
        // check cannot race another writer.
        let mut id = Uuid::new_v4();
        while candidates.iter().any(|c| c.id == id) {
            id = Uuid::new_v4();
        }

        let candidate = Candidate::from_parsed(parsed, id, Utc::now());
        candidates.push(candidate.clone());
        Ok(candidate)
    }

    async fn get(&self, id: Uuid) -> Result<Candidate, StoreError> {
        self.candidates
            .read()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> BoxStream<'_, Result<Candidate, StoreError>> {
        let snapshot = self.candidates.read().clone();
        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut candidates = self.candidates.write();
        let position = candidates
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;
        candidates.remove(position);
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.candidates.read().len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
