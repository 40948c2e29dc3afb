//! Error types for client construction and beacon delivery

use std::time::Duration;
use thiserror::Error;

/// Fatal, construction-time configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid websiteKey format")]
    InvalidWebsiteKey,

    #[error("Endpoint must use HTTPS")]
    InsecureEndpoint,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Per-beacon delivery failures. Never propagated out of `track`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status
    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Network error: request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Network error: request was cancelled")]
    Cancelled,

    #[error("Track failed: {0}")]
    Serialization(String),

    #[error("Track failed: no tokio runtime available")]
    NoRuntime,

    /// The delivery task panicked, e.g. on a runtime without timers
    #[error("Track failed: {0}")]
    Panicked(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}
