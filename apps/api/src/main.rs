mod candidates;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod parsing;
mod routes;
mod search;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{CandidateStore, MemoryCandidateStore, PgCandidateStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume search API v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    let state = AppState::new(store, config.clone());
    if state.parser.vocabulary().is_empty() {
        warn!("SKILL_VOCABULARY has no entries; skills will not be extracted");
    } else {
        info!(
            "Skill vocabulary: {} entries",
            state.parser.vocabulary().len()
        );
    }

    // The index is process-local; rebuild it from whatever the store already holds.
    state
        .search
        .rebuild(state.store.as_ref())
        .await
        .context("Failed to build the search index")?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn open_store(config: &Config) -> Result<Arc<dyn CandidateStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool)
                .await
                .context("Failed to apply database migrations")?;
            Ok(Arc::new(PgCandidateStore::new(pool)))
        }
        None => {
            info!("DATABASE_URL not set; candidates are kept in memory");
            Ok(Arc::new(MemoryCandidateStore::new()))
        }
    }
}
