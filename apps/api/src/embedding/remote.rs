//! HTTP client for a sentence-embedding inference server.
//!
//! Speaks the text-embeddings-inference `/embed` format:
//! request `{"inputs": [..]}`, response `[[f32, ..], ..]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{EmbeddingBackend, EmbeddingError};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    normalize: bool,
}

/// A pretrained sentence-embedding model reachable over HTTP.
#[derive(Clone)]
pub struct RemoteEmbeddingModel {
    client: Client,
    endpoint: String,
    model: String,
}

impl RemoteEmbeddingModel {
    pub fn new(base_url: &str, model: &str) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    /// Posts one batch, retrying on 429 and 5xx with exponential backoff.
    async fn post_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbedRequest {
            inputs: texts,
            normalize: true,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 250ms, 500ms
                let delay = Duration::from_millis(250 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let vectors: Vec<Vec<f32>> = response.json().await?;
            debug!(
                "Embedding call succeeded: model={}, inputs={}",
                self.model,
                texts.len()
            );
            return Ok(vectors);
        }

        Err(last_error.unwrap_or(EmbeddingError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl EmbeddingBackend for RemoteEmbeddingModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, EmbeddingError> {
        let vectors = self.post_batch(texts).await?;
        Ok(vectors
            .into_iter()
            .map(|v| v.into_iter().map(f64::from).collect())
            .collect())
    }
}
