//! Network seam for beacon delivery
//!
//! A [`Transport`] posts one serialized beacon and reports the HTTP status.
//! It receives a cancellation token; once the token fires the transport must
//! give up and resolve to [`TransportError::Cancelled`].

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{ConfigError, TransportError};

/// One outbound POST, fully prepared
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconRequest {
    pub endpoint: Url,
    pub user_agent: String,
    /// JSON-encoded sanitized pageview
    pub body: Vec<u8>,
}

impl BeaconRequest {
    pub fn body_json(&self) -> Result<serde_json::Value, TransportError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the beacon and return the response status code
    async fn post(
        &self,
        request: BeaconRequest,
        cancel: CancellationToken,
    ) -> Result<u16, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConfigError> {
        // The 5s deadline is owned by the dispatcher, not the client
        let client = Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        request: BeaconRequest,
        cancel: CancellationToken,
    ) -> Result<u16, TransportError> {
        let send = self
            .client
            .post(request.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, request.user_agent)
            .body(request.body)
            .send();

        // Dropping the pending future aborts the connection
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = send => result?,
        };

        Ok(response.status().as_u16())
    }
}
