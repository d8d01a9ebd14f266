//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGTERM/SIGINT (Ctrl+C elsewhere)
//! - Report which one arrived so the caller can log it

use std::io;

/// Resolve when the process is asked to terminate; yields the signal name.
#[cfg(unix)]
pub async fn wait_for_termination() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = interrupt.recv() => Ok("SIGINT"),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_termination() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
