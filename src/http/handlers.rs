//! GET and POST proxy handlers.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → (POST) form.rs: parse body + query, re-encode
//!     → trace record (method, path, user-agent, headers, form)
//!     → routing::destination: strip "/proxy/"
//!     → upstream::RequestForwarder: send, buffer body
//!     → response.rs: relay status + body
//! ```
//!
//! Every failure is turned into a status code here; nothing propagates
//! past the handler.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;
use crate::http::form::{is_form_body, Form};
use crate::http::request::{describe_headers, raw_target, user_agent};
use crate::http::response::relay;
use crate::observability::metrics;
use crate::routing::{extract_destination, ProxyMethod};
use crate::upstream::RequestForwarder;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: RequestForwarder,
    pub max_form_bytes: usize,
}

impl AppState {
    pub fn new(forwarder: RequestForwarder, max_form_bytes: usize) -> Self {
        Self {
            forwarder,
            max_form_bytes,
        }
    }
}

pub async fn get_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    handle(state, ProxyMethod::Get, request).await
}

pub async fn post_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    handle(state, ProxyMethod::Post, request).await
}

async fn handle(state: AppState, method: ProxyMethod, request: Request<Body>) -> Response {
    let start = Instant::now();

    let response = match proxy(&state, method, request).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                ProxyError::UnknownPath | ProxyError::EmptyDestination => {
                    tracing::debug!(method = method.as_str(), error = %e, "Extract destination failed");
                }
                ProxyError::FormParse(_) => {
                    tracing::error!(error = %e, "Parse form failed");
                }
                ProxyError::OutboundConstruction(_) => {
                    metrics::record_upstream_failure("construction");
                    tracing::error!(method = method.as_str(), error = %e, "Create outbound request failed");
                }
                ProxyError::RequestFailed(_) => {
                    metrics::record_upstream_failure("request");
                    tracing::error!(method = method.as_str(), error = %e, "Request failed");
                }
                ProxyError::ResponseRead(_) => {
                    metrics::record_upstream_failure("read");
                    tracing::error!(method = method.as_str(), error = %e, "Read response body failed");
                }
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

async fn proxy(state: &AppState, method: ProxyMethod, request: Request<Body>) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let target = raw_target(&parts.uri);

    let outbound_body = if method.forwards_body() {
        let form = read_form(&parts, body, state.max_form_bytes).await?;
        tracing::debug!(
            method = method.as_str(),
            path = target,
            user_agent = user_agent(&parts.headers),
            headers = %describe_headers(&parts.headers),
            forms = %form.describe(),
            "Proxy request"
        );
        Some(Bytes::from(form.encode()))
    } else {
        tracing::debug!(
            method = method.as_str(),
            path = target,
            user_agent = user_agent(&parts.headers),
            headers = %describe_headers(&parts.headers),
            "Proxy request"
        );
        None
    };

    let destination = extract_destination(target)?;
    if destination.is_empty() {
        return Err(ProxyError::EmptyDestination);
    }

    let upstream = state
        .forwarder
        .forward(method.as_method(), destination, &parts.headers, outbound_body)
        .await?;

    Ok(relay(upstream))
}

/// Parse the url-encoded body (when the content type says it is a form)
/// followed by the request-target query.
async fn read_form(parts: &Parts, body: Body, limit: usize) -> Result<Form, ProxyError> {
    let mut form = Form::default();

    if is_form_body(&parts.headers)? {
        let bytes = axum::body::to_bytes(body, limit)
            .await
            .map_err(|e| ProxyError::FormParse(format!("read body: {}", e)))?;
        form.extend_from_encoded(&bytes)?;
    }

    if let Some(query) = parts.uri.query() {
        form.extend_from_encoded(query.as_bytes())?;
    }

    Ok(form)
}
