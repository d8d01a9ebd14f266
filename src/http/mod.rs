//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper HTTP/1.1, CORS + trace layers)
//!     → handlers.rs (GET/POST entry points)
//!     → request.rs (request-target, trace dumps)
//!     → form.rs (POST form parse and re-encode)
//!     → [upstream forwarder]
//!     → response.rs (relay status + body)
//!     → Send to client
//! ```

pub mod cors;
pub mod form;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::AppState;
pub use server::ProxyServer;
