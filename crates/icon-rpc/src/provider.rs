// icon-rpc/src/provider.rs
use crate::config::ClientConfig;
use crate::types::RpcResponse;
use crate::{RpcError, RpcResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Carries a serialized request to a node and returns the raw response body.
///
/// Timeouts and retries are the provider's business; the client propagates
/// whatever terminal error it reports.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn send(&self, body: String) -> RpcResult<Vec<u8>>;
}

/// JSON over HTTP POST
pub struct HttpProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> RpcResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint: endpoint.into(), client })
    }

    pub fn from_config(config: &ClientConfig) -> RpcResult<Self> {
        Self::with_timeout(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn send(&self, body: String) -> RpcResult<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "request failed");
                RpcError::from(e)
            })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        // Nodes answer RPC errors with a 4xx/5xx status and a regular error envelope
        let envelope = serde_json::from_slice::<RpcResponse>(&bytes).ok();
        if envelope.map_or(false, |response| response.error.is_some()) {
            return Ok(bytes.to_vec());
        }

        tracing::warn!(endpoint = %self.endpoint, %status, "unexpected HTTP status");
        Err(RpcError::transport(
            i64::from(status.as_u16()),
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}
