//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, DNS). Retried once.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The server answered with a structured error body. Never retried.
    #[error("API error {code}: {detail}")]
    Api {
        status: u16,
        code: String,
        detail: String,
    },

    /// 401 from the server; tokens have been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
