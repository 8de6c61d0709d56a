pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::candidates::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload", post(handlers::handle_upload))
        .route("/search", get(handlers::handle_search))
        .route("/candidates", get(handlers::handle_list))
        .route(
            "/candidates/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
