use std::sync::Arc;

use crate::config::Config;
use crate::parsing::{FieldParser, SkillVocabulary};
use crate::search::{SearchEngine, SearchLimits};
use crate::store::{CandidateStore, MemoryCandidateStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn CandidateStore>,
    pub search: Arc<SearchEngine>,
    pub parser: Arc<FieldParser>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn CandidateStore>, config: Config) -> Self {
        let vocabulary = config
            .skill_vocabulary
            .as_deref()
            .map(SkillVocabulary::from_csv)
            .unwrap_or_default();
        let search = SearchEngine::new(SearchLimits {
            max_results: config.search_limit,
            max_query_chars: config.max_query_chars,
        });

        Self {
            store,
            search: Arc::new(search),
            parser: Arc::new(FieldParser::new(vocabulary, config.summary_chars)),
            config,
        }
    }

    #[cfg(test)]
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryCandidateStore::new()), config)
    }
}
