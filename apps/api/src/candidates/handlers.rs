use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::candidates::ingest::{ingest, Upload};
use crate::errors::AppError;
use crate::extraction::DeclaredType;
use crate::models::candidate::{Candidate, CandidateSummary, SearchResult};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub candidate_id: Uuid,
    pub parsed: Candidate,
}

/// Every field is a string so that a malformed value never rejects the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub skill: Option<String>,
    pub limit: Option<String>,
}

/// POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // Browsers send an empty filename when nothing was selected.
        if field.file_name() == Some("") {
            return Err(AppError::BadRequest("No file selected".to_string()));
        }
        let declared = DeclaredType::new(
            field.file_name().map(str::to_string),
            field.content_type().map(str::to_string),
        );
        let bytes = field.bytes().await?;
        upload = Some(Upload { bytes, declared });
        break;
    }

    let upload = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{FILE_FIELD}'"))
    })?;
    let candidate = ingest(&state, upload).await?;

    Ok(Json(UploadResponse {
        candidate_id: candidate.id,
        parsed: candidate,
    }))
}

/// GET /search?q=<text>[&limit=n] or GET /search?skill=<name>
///
/// Never fails: anything that goes wrong degrades to an empty list.
pub async fn handle_search(
    State(state): State<AppState>,
    params: Option<Query<SearchParams>>,
) -> Json<Vec<SearchResult>> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let limit = params
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<usize>().ok());

    let skill = params.skill.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let outcome = match skill {
        Some(skill) => state.search.query_skill(skill, limit),
        None => state
            .search
            .query(params.q.as_deref().unwrap_or_default(), limit),
    };

    match outcome {
        Ok(results) => Json(results),
        Err(e) => {
            warn!("Search degraded to an empty result: {e}");
            Json(Vec::new())
        }
    }
}

/// GET /candidates
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let summaries: Vec<CandidateSummary> = state
        .store
        .list()
        .map_ok(CandidateSummary::from)
        .try_collect()
        .await?;
    Ok(Json(summaries))
}

/// GET /candidates/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    Ok(Json(state.store.get(id).await?))
}

/// DELETE /candidates/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    state.search.remove(id);
    Ok(StatusCode::NO_CONTENT)
}
