//! Inbound request inspection.
//!
//! # Responsibilities
//! - Recover the raw request-target the destination is read from
//! - Render headers for the per-request trace record
//!
//! # Design Decisions
//! - The request-target keeps its query string; it is part of the destination
//! - Header dumps keep every value of multi-valued headers

use axum::http::{header, HeaderMap, Uri};

/// The request-target as sent by the client (path plus query).
pub fn raw_target(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// The client's User-Agent, or an empty string.
pub fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name:[v1 v2]` entries joined with `; `, in header map order.
pub fn describe_headers(headers: &HeaderMap) -> String {
    headers
        .keys()
        .map(|name| {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            format!("{}:[{}]", name, values.join(" "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
