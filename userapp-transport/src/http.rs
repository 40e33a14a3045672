//! `reqwest`-backed implementation of [`HttpTransport`].

use crate::{Credentials, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, trace};

/// Transport configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            user_agent: concat!("userapp-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Build(Box::new(e)))?;

        Ok(Self { http_client })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(Box::new(err))
    } else if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(Box::new(err))
    } else {
        TransportError::Request(Box::new(err))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        body: String,
        credentials: &Credentials,
    ) -> Result<HttpResponse, TransportError> {
        debug!(url, bytes = body.len(), "Sending POST request");

        let response = self
            .http_client
            .post(url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(Box::new(e)))?;

        trace!(status, "Response body:\n{}", body);
        Ok(HttpResponse { status, body })
    }
}
