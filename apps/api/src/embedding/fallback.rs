//! Deterministic bag-of-words embeddings, used whenever the primary model is unavailable.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum dimensionality of a fallback vector.
pub const MIN_DIMENSION: usize = 300;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\w+").expect("token pattern is valid"))
}

/// Term-frequency vectors over a vocabulary shared by the whole batch, L2 normalised.
///
/// Every vector has length `max(300, vocabulary size)`; a text with no tokens
/// yields the zero vector.
pub fn embed(texts: &[String]) -> Vec<Vec<f64>> {
    let mut vocab: HashMap<String, usize> = HashMap::new();
    let tokenized: Vec<Vec<String>> = texts
        .iter()
        .map(|text| {
            let lower = text.to_lowercase();
            let tokens: Vec<String> = token_pattern()
                .find_iter(&lower)
                .map(|m| m.as_str().to_string())
                .collect();
            for token in &tokens {
                let next = vocab.len();
                vocab.entry(token.clone()).or_insert(next);
            }
            tokens
        })
        .collect();

    let dimension = MIN_DIMENSION.max(vocab.len());

    tokenized
        .iter()
        .map(|tokens| {
            let mut vec = vec![0.0_f64; dimension];
            for token in tokens {
                if let Some(&idx) = vocab.get(token) {
                    vec[idx] += 1.0;
                }
            }
            let norm = l2_norm(&vec);
            let norm = if norm == 0.0 { 1.0 } else { norm };
            vec.iter_mut().for_each(|x| *x /= norm);
            vec
        })
        .collect()
}

pub(crate) fn l2_norm(vec: &[f64]) -> f64 {
    vec.iter().map(|x| x * x).sum::<f64>().sqrt()
}
