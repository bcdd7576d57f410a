use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llm_client::AdvisoryError;

/// Status and body of a completed HTTP exchange, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The only network seam of the advisory client. Implementations POST a JSON
/// body with bearer auth and hand back the raw response; `LlmClient` decides
/// what the status and body mean.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, AdvisoryError>;
}

/// `reqwest`-backed transport. No client-wide timeout: calls run until the
/// transport gives up unless the caller passes one.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, AdvisoryError> {
        let mut request = self.client.post(url).bearer_auth(bearer).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        debug!("Advisory endpoint responded: status={status}, bytes={}", body.len());
        Ok(RawResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> AdvisoryError {
    if err.is_connect() || err.is_timeout() {
        AdvisoryError::Connectivity(err.to_string())
    } else {
        AdvisoryError::Unknown(err.to_string())
    }
}
