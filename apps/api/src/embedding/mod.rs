//! Embedding Provider — numeric vectors for texts, with a deterministic fallback.
//!
//! The primary backend is loaded lazily, once per process, inside an
//! `EmbeddingContext`. Whether the process runs on the primary model or the
//! bag-of-words fallback is decided at that single load and recorded as a
//! `ModelHandle` variant. Errors never leave this module: every failure
//! degrades to the fallback path with a warning.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::Config;

pub mod fallback;
pub mod remote;

use remote::RemoteEmbeddingModel;

const WARMUP_TEXT: &str = "embedding model warmup";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gave up after {retries} retries")]
    Exhausted { retries: u32 },

    #[error("Model returned {got} vectors for {expected} inputs")]
    Count { expected: usize, got: usize },

    #[error("Model returned vectors of unequal dimension")]
    Ragged,

    #[error("Model returned a non-finite component")]
    NonFinite,
}

/// A source of sentence embeddings. Implement this to plug in another model runtime.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, EmbeddingError>;
}

/// Outcome of the one-time model load.
#[derive(Clone)]
pub enum ModelHandle {
    Primary(Arc<dyn EmbeddingBackend>),
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMode {
    Uninitialized,
    Primary,
    Fallback,
}

/// Process-scoped owner of the embedding model handle.
///
/// Concurrent first calls are serialized by the `OnceCell`: exactly one load runs
/// and every caller observes its result. After that the handle is read-only.
pub struct EmbeddingContext {
    backend: Option<Arc<dyn EmbeddingBackend>>,
    load_timeout: Duration,
    handle: OnceCell<ModelHandle>,
}

impl EmbeddingContext {
    /// `backend` is not contacted until the first embedding request.
    pub fn new(backend: Option<Arc<dyn EmbeddingBackend>>, load_timeout: Duration) -> Self {
        Self {
            backend,
            load_timeout,
            handle: OnceCell::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let backend: Option<Arc<dyn EmbeddingBackend>> = match config.embedding_url.as_deref() {
            Some(url) => match RemoteEmbeddingModel::new(url, &config.embedding_model) {
                Ok(model) => Some(Arc::new(model)),
                Err(e) => {
                    warn!("Could not build embedding client: {e}. Using fallback embeddings.");
                    None
                }
            },
            None => None,
        };
        Self::new(backend, Duration::from_secs(config.embedding_load_timeout_secs))
    }

    /// A context pinned to the bag-of-words path.
    pub fn fallback_only() -> Self {
        Self {
            backend: None,
            load_timeout: Duration::ZERO,
            handle: OnceCell::new_with(Some(ModelHandle::Fallback)),
        }
    }

    pub fn mode(&self) -> EmbeddingMode {
        match self.handle.get() {
            None => EmbeddingMode::Uninitialized,
            Some(ModelHandle::Primary(_)) => EmbeddingMode::Primary,
            Some(ModelHandle::Fallback) => EmbeddingMode::Fallback,
        }
    }

    async fn handle(&self) -> &ModelHandle {
        self.handle.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> ModelHandle {
        let Some(backend) = self.backend.clone() else {
            info!("No embedding model configured. Using fallback embeddings.");
            return ModelHandle::Fallback;
        };

        let warmup = vec![WARMUP_TEXT.to_string()];
        match tokio::time::timeout(self.load_timeout, backend.embed(&warmup)).await {
            Ok(Ok(vectors)) => match validate_shape(&vectors, 1) {
                Ok(()) => {
                    info!(
                        "Loaded embedding model: {} (dim {})",
                        backend.name(),
                        vectors[0].len()
                    );
                    ModelHandle::Primary(backend)
                }
                Err(e) => {
                    warn!("Could not load embedding model {}: {e}. Using fallback embeddings.", backend.name());
                    ModelHandle::Fallback
                }
            },
            Ok(Err(e)) => {
                warn!("Could not load embedding model {}: {e}. Using fallback embeddings.", backend.name());
                ModelHandle::Fallback
            }
            Err(_) => {
                warn!(
                    "Loading embedding model {} timed out after {:?}. Using fallback embeddings.",
                    backend.name(),
                    self.load_timeout
                );
                ModelHandle::Fallback
            }
        }
    }

    /// One vector per input text, all of equal dimension.
    pub async fn embed(&self, texts: &[String]) -> Vec<Vec<f64>> {
        if texts.is_empty() {
            return vec![];
        }

        match self.handle().await {
            ModelHandle::Primary(backend) => {
                let result = backend
                    .embed(texts)
                    .await
                    .and_then(|vectors| validate_shape(&vectors, texts.len()).map(|_| vectors));
                match result {
                    Ok(vectors) => vectors,
                    Err(e) => {
                        warn!("Embedding inference failed: {e}. Using fallback embeddings for this call.");
                        fallback::embed(texts)
                    }
                }
            }
            ModelHandle::Fallback => fallback::embed(texts),
        }
    }
}

fn validate_shape(vectors: &[Vec<f64>], expected: usize) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::Count {
            expected,
            got: vectors.len(),
        });
    }
    let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
    if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
        return Err(EmbeddingError::Ragged);
    }
    if !vectors.iter().flatten().all(|x| x.is_finite()) {
        return Err(EmbeddingError::NonFinite);
    }
    Ok(())
}

/// Cosine similarity in [-1, 1]. Vectors of different length are truncated to the
/// shorter one; a zero vector on either side gives 0.
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    let len = u.len().min(v.len());
    let (u, v) = (&u[..len], &v[..len]);

    let norm_u = fallback::l2_norm(u);
    let norm_v = fallback::l2_norm(v);
    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }

    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    (dot / (norm_u * norm_v)).clamp(-1.0, 1.0)
}
