//! Client configuration

use std::time::Duration;

/// Client configuration for connecting to the POS back-office server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Extra attempts after a network failure (API errors are never retried)
    pub retries: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            retries: 1,
        }
    }

    /// Load from environment (POS_SERVER_URL, POS_CLIENT_TIMEOUT_SECS)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("POS_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        let mut config = Self::new(base_url);
        if let Some(secs) = std::env::var("POS_CLIENT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}
