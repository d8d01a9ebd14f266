//! CORS layer construction.
//!
//! A `"*"` entry in any configured list switches that dimension to the
//! wildcard. Entries that are not valid header values are skipped;
//! `config::validation` rejects them before a server is built.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|e| e == "*")
}

/// Build the CORS layer applied to every response.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(
            config
                .allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok()),
        )
    };

    let methods = if is_wildcard(&config.allowed_methods) {
        AllowMethods::any()
    } else {
        AllowMethods::list(
            config
                .allowed_methods
                .iter()
                .filter_map(|m| Method::from_bytes(m.as_bytes()).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(headers)
        .allow_methods(methods)
}
