//! Error types for request forwarding and server lifecycle.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Per-request failure. Always converted to a status code by the handlers.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("unknown path")]
    UnknownPath,

    #[error("empty destination")]
    EmptyDestination,

    #[error("parse form failed: {0}")]
    FormParse(String),

    #[error("create outbound request failed: {0}")]
    OutboundConstruction(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("read response body failed: {0}")]
    ResponseRead(String),
}

impl ProxyError {
    /// Status code returned to the inbound caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UnknownPath
            | ProxyError::EmptyDestination
            | ProxyError::FormParse(_)
            | ProxyError::RequestFailed(_) => StatusCode::BAD_REQUEST,
            ProxyError::OutboundConstruction(_) | ProxyError::ResponseRead(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Misuse of the server start/shutdown state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("proxy server already started")]
    AlreadyStarted,

    #[error("proxy server not started")]
    NotStarted,
}
