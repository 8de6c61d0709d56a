//! Search Engine: ranked free-text and skill lookup over stored candidates.
//!
//! The index lives behind a single `RwLock`. Inserts and removals take the
//! write lock once, so a concurrent search sees a candidate either fully
//! indexed or not at all.
//!
//! Ingestion stores a candidate before indexing it, so a delete can land in
//! between. Such an id is remembered and its late insert is dropped.

pub mod index;
pub mod tokenize;

use std::collections::HashSet;

use futures::TryStreamExt;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::candidate::{Candidate, SearchResult};
use crate::store::{CandidateStore, StoreError};

pub use index::InvertedIndex;
use tokenize::query_terms;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Default and maximum number of results per query.
    pub max_results: usize,
    pub max_query_chars: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_results: 100,
            max_query_chars: 256,
        }
    }
}

#[derive(Debug, Default)]
struct IndexState {
    index: InvertedIndex,
    /// Ids deleted before their index insert arrived.
    deleted: HashSet<Uuid>,
}

pub struct SearchEngine {
    state: RwLock<IndexState>,
    limits: SearchLimits,
}

impl SearchEngine {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            limits,
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    pub fn insert(&self, candidate: &Candidate) {
        let mut state = self.state.write();
        if state.deleted.remove(&candidate.id) {
            debug!("Skipping index insert for deleted candidate {}", candidate.id);
            return;
        }
        state.index.insert(candidate);
    }

    /// Drops a deleted candidate. If it is not indexed yet, the pending
    /// insert is suppressed instead. Returns whether it was indexed.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut state = self.state.write();
        if state.index.remove(id) {
            return true;
        }
        state.deleted.insert(id);
        false
    }

    /// Ranked search. A query with no searchable terms yields no results.
    pub fn query(&self, text: &str, limit: Option<usize>) -> Result<Vec<SearchResult>, SearchError> {
        self.validate(text)?;
        let terms = query_terms(text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.state.read().index.search(&terms, self.clamp(limit)))
    }

    /// Exact skill filter, oldest candidates first.
    pub fn query_skill(&self, skill: &str, limit: Option<usize>) -> Result<Vec<SearchResult>, SearchError> {
        self.validate(skill)?;
        let skill = skill.trim();
        if skill.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.state.read().index.with_skill(skill, self.clamp(limit)))
    }

    /// Replaces the index with the store's current contents. The new index is
    /// built off-lock and swapped in whole.
    pub async fn rebuild(&self, store: &dyn CandidateStore) -> Result<usize, StoreError> {
        let mut fresh = InvertedIndex::new();
        let mut candidates = store.list();
        while let Some(candidate) = candidates.try_next().await? {
            fresh.insert(&candidate);
        }

        let count = fresh.len();
        self.state.write().index = fresh;
        info!("Search index rebuilt with {count} candidates");
        Ok(count)
    }

    fn validate(&self, text: &str) -> Result<(), SearchError> {
        let chars = text.chars().count();
        if chars > self.limits.max_query_chars {
            return Err(SearchError::InvalidQuery(format!(
                "query is {chars} characters; the maximum is {}",
                self.limits.max_query_chars
            )));
        }
        Ok(())
    }

    fn clamp(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.limits.max_results)
            .min(self.limits.max_results)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::ParsedResume;
    use crate::parsing::FieldParser;
    use crate::store::MemoryCandidateStore;

    async fn store_and_index(
        store: &MemoryCandidateStore,
        engine: &SearchEngine,
        text: &str,
    ) -> Candidate {
        let parsed = FieldParser::default().parse(text);
        let candidate = store.put(parsed).await.unwrap();
        engine.insert(&candidate);
        candidate
    }

    #[test]
    fn test_empty_query_is_empty() {
        let engine = SearchEngine::default();
        engine.insert(&Candidate::from_parsed(
            ParsedResume {
                full_text: "anything".into(),
                ..Default::default()
            },
            Uuid::new_v4(),
            chrono::Utc::now(),
        ));
        assert!(engine.query("", None).unwrap().is_empty());
        assert!(engine.query("   ", None).unwrap().is_empty());
        assert!(engine.query("?!", None).unwrap().is_empty());
    }

    #[test]
    fn test_overlong_query_is_invalid() {
        let engine = SearchEngine::new(SearchLimits {
            max_results: 10,
            max_query_chars: 8,
        });
        assert!(matches!(
            engine.query("far too long query", None),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_searchable_immediately_after_put() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        let stored = store_and_index(&store, &engine, "Ada Lovelace\nzyxwquux enthusiast").await;

        let results = engine.query("zyxwquux", None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_go_scenario() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        let gopher = store_and_index(&store, &engine, "Jane Doe\njane@x.com\nSkills: Python, Go").await;
        store_and_index(&store, &engine, "John Roe\njohn@y.com\nSkills: Java, SQL").await;

        let results = engine.query("Go", None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, gopher.id);
        assert_eq!(results[0].full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(results[0].email.as_deref(), Some("jane@x.com"));
    }

    #[tokio::test]
    async fn test_queries_are_deterministic() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        for i in 0..10 {
            store_and_index(&store, &engine, &format!("Person {i}\nDocker and Kubernetes")).await;
        }
        let first = engine.query("docker kubernetes", None).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.query("docker kubernetes", None).unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_limit_is_clamped_to_maximum() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::new(SearchLimits {
            max_results: 2,
            max_query_chars: 64,
        });
        for i in 0..4 {
            store_and_index(&store, &engine, &format!("Person {i}\nScala")).await;
        }
        assert_eq!(engine.query("scala", Some(50)).unwrap().len(), 2);
        assert_eq!(engine.query("scala", Some(1)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skill_filter() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        let a = store_and_index(&store, &engine, "Ada\nSkills: Rust, Docker").await;
        store_and_index(&store, &engine, "Bob\nSkills: Java").await;

        let results = engine.query_skill("docker", None).unwrap();
        assert_eq!(results.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id]);
        assert!(engine.query_skill("  ", None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_from_store() {
        let store = MemoryCandidateStore::new();
        let seeded = store
            .put(FieldParser::default().parse("Grace Hopper\nCOBOL pioneer"))
            .await
            .unwrap();

        let engine = SearchEngine::default();
        assert!(engine.query("cobol", None).unwrap().is_empty());

        assert_eq!(engine.rebuild(&store).await.unwrap(), 1);
        assert_eq!(engine.query("cobol", None).unwrap()[0].id, seeded.id);
    }

    #[tokio::test]
    async fn test_remove_hides_candidate() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        let c = store_and_index(&store, &engine, "Linus\nLinux kernel").await;

        assert!(engine.remove(c.id));
        assert!(engine.query("linux", None).unwrap().is_empty());
        assert_eq!(engine.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_before_index_insert_wins() {
        let store = MemoryCandidateStore::new();
        let engine = SearchEngine::default();
        let stored = store
            .put(FieldParser::default().parse("Barbara Liskov
CLU designer"))
            .await
            .unwrap();

        // Delete completes while ingestion has stored but not yet indexed.
        store.delete(stored.id).await.unwrap();
        assert!(!engine.remove(stored.id));
        engine.insert(&stored);

        assert!(engine.query("liskov", None).unwrap().is_empty());
        assert_eq!(engine.len(), 0);

        // The suppression is one-shot.
        engine.insert(&stored);
        assert_eq!(engine.len(), 1);
    }
}
