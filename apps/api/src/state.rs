use std::sync::Arc;

use crate::audit::AuditStore;
use crate::config::Config;
use crate::embedding::EmbeddingContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Process-scoped embedding model handle, loaded on first use.
    pub embeddings: Arc<EmbeddingContext>,
    /// Append-only decision log. Default: in-memory.
    pub audit: Arc<dyn AuditStore>,
}
