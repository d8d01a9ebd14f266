//! Method dispatch.
//!
//! # Design Decisions
//! - Only GET and POST are proxied; the set is closed, so it is an enum
//! - Every path is routed to the handlers; path validation is the
//!   destination extractor's job, which yields 400 instead of 404
//! - Other methods get 405 from the method router

use axum::http::Method;
use axum::routing::{get, MethodRouter};
use axum::Router;

use crate::http::handlers::{get_handler, post_handler, AppState};

/// The methods the proxy forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMethod {
    Get,
    Post,
}

impl ProxyMethod {
    /// Method used for the outbound request.
    pub fn as_method(self) -> Method {
        match self {
            ProxyMethod::Get => Method::GET,
            ProxyMethod::Post => Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProxyMethod::Get => "GET",
            ProxyMethod::Post => "POST",
        }
    }

    /// Whether the inbound body is read and forwarded.
    pub fn forwards_body(self) -> bool {
        matches!(self, ProxyMethod::Post)
    }
}

fn proxy_methods() -> MethodRouter<AppState> {
    get(get_handler).post(post_handler)
}

/// Bind the GET and POST handlers on every path.
pub fn proxy_routes(state: AppState) -> Router {
    Router::new()
        .route("/", proxy_methods())
        .route("/{*target}", proxy_methods())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(ProxyMethod::Get.as_method(), Method::GET);
        assert_eq!(ProxyMethod::Post.as_method(), Method::POST);
        assert_eq!(ProxyMethod::Get.as_str(), "GET");
        assert!(ProxyMethod::Post.forwards_body());
        assert!(!ProxyMethod::Get.forwards_body());
    }
}
