//! Ingestion pipeline: extract → parse → store → index.
//!
//! Extraction and parsing are CPU-bound and run on the blocking pool under
//! `EXTRACTION_TIMEOUT_SECS`. The index is only touched after the store has
//! committed, so a failed upload leaves no trace in either.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{self, DeclaredType, ExtractError};
use crate::models::candidate::{Candidate, ParsedResume};
use crate::parsing::FieldParser;
use crate::state::AppState;

/// A file received from the client, before extraction.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Bytes,
    pub declared: DeclaredType,
}

pub async fn ingest(state: &AppState, upload: Upload) -> Result<Candidate, AppError> {
    let limit = Duration::from_secs(state.config.extraction_timeout_secs);
    let parsed = extract_and_parse(upload, Arc::clone(&state.parser), limit).await?;

    let candidate = state.store.put(parsed).await?;
    state.search.insert(&candidate);

    info!(
        id = %candidate.id,
        name = candidate.full_name.is_some(),
        emails = candidate.emails.len(),
        skills = candidate.skills.len(),
        education = candidate.education.len(),
        experience = candidate.experience.len(),
        chars = candidate.full_text.chars().count(),
        "Stored candidate"
    );
    Ok(candidate)
}

pub async fn extract_and_parse(
    upload: Upload,
    parser: Arc<FieldParser>,
    limit: Duration,
) -> Result<ParsedResume, ExtractError> {
    run_blocking(limit, move || {
        let text = extraction::extract(&upload.bytes, &upload.declared)?;
        Ok(parser.parse(&text))
    })
    .await?
}

/// Runs `work` on the blocking pool. If it outlives `limit` the caller gets
/// `ExtractionTimeout`; the thread itself runs to completion and its result
/// is dropped.
async fn run_blocking<F, T>(limit: Duration, work: F) -> Result<T, ExtractError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ExtractError::ExtractionFailed(format!(
            "extraction task failed: {e}"
        ))),
        Err(_) => Err(ExtractError::ExtractionTimeout(limit.as_secs())),
    }
}
