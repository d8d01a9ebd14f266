//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr or log file
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Every request emits one debug trace record before forwarding
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;
