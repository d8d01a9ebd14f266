//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, request-target)
//!     → router.rs (GET/POST dispatch to handlers)
//!     → destination.rs (strip "/proxy/", yield destination URL)
//!     → Return: destination string or UnknownPath
//! ```
//!
//! # Design Decisions
//! - Routes built once at server start, immutable at runtime
//! - No regex in hot path (literal prefix only)
//! - Deterministic: same input always yields same destination

pub mod destination;
pub mod router;

pub use destination::{extract_destination, PROXY_PREFIX};
pub use router::{proxy_routes, ProxyMethod};
