//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured bind address
//!     → listener.rs (parse, bind)
//!     → accept loop in http::server
//!     → connection.rs (per-connection id for logs)
//!     → Hand off to HTTP layer
//! ```

pub mod connection;
pub mod listener;
