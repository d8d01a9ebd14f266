//! Path-encoded HTTP forwarding proxy library.
//!
//! `GET /proxy/<url>` and `POST /proxy/<url>` are replayed against `<url>`
//! and the upstream status and body are relayed back.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{LifecycleError, ProxyError};
pub use http::ProxyServer;
