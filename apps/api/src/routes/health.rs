use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Returns service status, version, store backend and candidate count.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let (status, candidates) = match state.store.count().await {
        Ok(n) => ("ok", Some(n)),
        Err(e) => {
            warn!("Health check could not count candidates: {e}");
            ("degraded", None)
        }
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "store": state.store.backend(),
        "candidates": candidates,
        "indexed": state.search.len(),
    }))
}
