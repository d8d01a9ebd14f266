//! Response relaying.
//!
//! # Responsibilities
//! - Copy the upstream status code and body to the caller
//! - Carry the upstream content type over when present
//!
//! # Design Decisions
//! - Upstream headers other than Content-Type are not relayed
//! - Write failures toward the caller happen after the status is committed;
//!   the server's connection task logs and drops them

use axum::body::Body;
use axum::http::header;
use axum::response::Response;

use crate::upstream::UpstreamResponse;

/// Turn a buffered upstream response into the caller's response.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    if let Some(content_type) = upstream.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}
