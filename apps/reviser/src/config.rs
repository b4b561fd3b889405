use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the critique service; `/api/revise` is appended.
    pub api_base_url: String,
    /// Unset means requests never time out.
    pub http_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let http_timeout = match std::env::var("REVISER_HTTP_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(
                secs.parse::<u64>()
                    .context("REVISER_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            Err(_) => None,
        };

        Ok(Config {
            api_base_url: require_env("REVISER_API_BASE_URL")?,
            http_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
