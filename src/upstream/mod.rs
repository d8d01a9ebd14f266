//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! method + destination + inbound headers + body
//!     → forwarder.rs (parse URL, apply header policy)
//!     → transport.rs (send, buffer whole body)
//!     → UpstreamResponse (status, content type, bytes)
//! ```
//!
//! # Design Decisions
//! - No retries: a failed exchange is reported once
//! - Whole bodies are buffered; no streaming to the caller

pub mod forwarder;
pub mod transport;

pub use forwarder::RequestForwarder;
pub use transport::{OutboundRequest, ReqwestTransport, UpstreamResponse, UpstreamTransport};
