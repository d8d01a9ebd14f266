//! Upstream HTTP transport.
//!
//! # Responsibilities
//! - Execute one fully-built outbound request
//! - Buffer the whole upstream body before returning
//! - Classify failures as send failures or body read failures
//!
//! # Design Decisions
//! - A trait object so the server can run against a stub in tests
//! - One client shared by every request; pooling stays inside reqwest
//! - The optional deadline covers send and body read together

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use futures_util::future::BoxFuture;
use url::Url;

use crate::error::ProxyError;

/// A request ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// An upstream response with its body fully read.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Executes outbound requests.
///
/// Implementations report connection-level failures as
/// [`ProxyError::RequestFailed`] and body read failures as
/// [`ProxyError::ResponseRead`].
pub trait UpstreamTransport: Send + Sync {
    fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    deadline: Option<Duration>,
}

impl ReqwestTransport {
    /// Build the default client, optionally bounding each exchange.
    pub fn new(deadline: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, deadline))
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client, deadline: Option<Duration>) -> Self {
        Self { client, deadline }
    }

    async fn exchange(&self, request: OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProxyError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

        // The connection goes back to the pool (or closes) when `response` is
        // consumed here, whether or not the read succeeds.
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::ResponseRead(e.to_string()))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

impl UpstreamTransport for ReqwestTransport {
    fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        Box::pin(async move {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, self.exchange(request))
                    .await
                    .map_err(|_| {
                        ProxyError::RequestFailed(format!(
                            "no response within {}s",
                            deadline.as_secs_f64()
                        ))
                    })?,
                None => self.exchange(request).await,
            }
        })
    }
}
