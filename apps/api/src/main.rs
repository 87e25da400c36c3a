mod audit;
mod config;
mod embedding;
mod errors;
mod models;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::audit::InMemoryAuditStore;
use crate::config::Config;
use crate::embedding::EmbeddingContext;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathfinder v{}", env!("CARGO_PKG_VERSION"));

    // Embedding model is loaded lazily on the first scoring request
    let embeddings = Arc::new(EmbeddingContext::from_config(&config));
    match &config.embedding_url {
        Some(url) => info!(
            "Embedding model configured: {} at {url}",
            config.embedding_model
        ),
        None => info!("No EMBEDDING_URL set; bag-of-words fallback embeddings will be used"),
    }

    let audit = Arc::new(InMemoryAuditStore::new());
    info!("In-memory audit store initialized");

    // Build app state
    let state = AppState {
        config: config.clone(),
        embeddings,
        audit,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
