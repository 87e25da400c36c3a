//! Similarity of free text and of project lists against a job description.

use crate::embedding::{cosine_similarity, EmbeddingContext};

/// Credit given to a candidate who lists no projects.
pub const NO_PROJECTS_BASELINE: f64 = 0.3;

/// Cosine similarity of two texts, embedded together so the fallback vocabulary is shared.
pub async fn similarity(embeddings: &EmbeddingContext, text1: &str, text2: &str) -> f64 {
    let vectors = embeddings
        .embed(&[text1.to_string(), text2.to_string()])
        .await;
    match vectors.as_slice() {
        [v1, v2] => cosine_similarity(v1, v2),
        _ => 0.0,
    }
}

/// Project relevance in [0, 1]: raw similarity stretched by `(sim - 0.1) / 0.7`.
pub async fn project_relevance(
    embeddings: &EmbeddingContext,
    projects: &[String],
    jd_text: &str,
) -> f64 {
    if projects.is_empty() {
        return NO_PROJECTS_BASELINE;
    }
    let project_text = projects.join(" ");
    let sim = similarity(embeddings, &project_text, jd_text).await;
    ((sim - 0.1) / 0.7).clamp(0.0, 1.0)
}
