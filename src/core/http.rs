//! Outbound HTTP seam.
//!
//! Providers only build URLs and parse bodies; the round trip goes through
//! `HttpTransport` so the translator can be driven without a network.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::shared::error::{AppError, AppResult};

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue exactly one GET. No retries.
    async fn get(&self, url: &str) -> AppResult<HttpResponse>;
}

pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("abajiang/translator")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> AppResult<HttpResponse> {
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "http response received");
        Ok(HttpResponse { status, body })
    }
}
