use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; the embedding model is used only when `EMBEDDING_URL` is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of a sentence-embedding inference server. `None` pins the fallback path.
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_load_timeout_secs: u64,
    /// Default cap on audit log query results.
    pub audit_query_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_url: std::env::var("EMBEDDING_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            embedding_load_timeout_secs: parse_env("EMBEDDING_LOAD_TIMEOUT_SECS", 30)
                .context("EMBEDDING_LOAD_TIMEOUT_SECS must be a whole number of seconds")?,
            audit_query_limit: parse_env("AUDIT_QUERY_LIMIT", 100)
                .context("AUDIT_QUERY_LIMIT must be a positive integer")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            embedding_url: None,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_load_timeout_secs: 30,
            audit_query_limit: 100,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        Err(_) => Ok(default),
    }
}
