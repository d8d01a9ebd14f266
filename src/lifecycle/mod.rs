//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (http::server):
//!     Build router → spawn accept task holding a CrashNotifier
//!
//! Crash (shutdown.rs):
//!     Accept task exits unexpectedly → notifier drops armed → try_send
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main calls ProxyServer::shutdown
//! ```
//!
//! # Design Decisions
//! - Crash notification never blocks the exiting task
//! - Shutdown has timeout: forced close after the grace period
//! - No automatic restart; the owning process decides

pub mod shutdown;
pub mod signals;

pub use shutdown::CrashNotifier;
pub use signals::wait_for_termination;
