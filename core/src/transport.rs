//! The seam between `SystemApi` and the network.
//!
//! # Design
//! A transport turns an `HttpRequest` into an `HttpResponse` and nothing
//! more: it never interprets status codes, so a 503 comes back as data and
//! the exception factory decides what it means. Only failures that leave no
//! response at all (DNS, refused connection, timeout) are errors here.
//!
//! `HttpTransport` is the bundled implementation: ureq for blocking calls,
//! reqwest for async ones. Dropping a reqwest future closes its connection,
//! so a cancelled call releases the socket right away.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking request execution.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Suspendable request execution. Dropping the future aborts the request.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute_async(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Transport used when the caller configures none.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { agent, client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        trace!(method = request.method.as_str(), path = %request.path, "sending blocking request");

        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&request.path),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[async_trait]
impl AsyncTransport for HttpTransport {
    async fn execute_async(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        trace!(method = request.method.as_str(), path = %request.path, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.path),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

/// Every header as a pair. Values that are not valid UTF-8 are decoded lossily.
fn header_pairs(headers: &::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
