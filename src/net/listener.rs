//! TCP listener setup.
//!
//! # Responsibilities
//! - Parse and bind the configured address
//! - Report the bound address for logging

use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The configured address is not a socket address.
    Address(String),
    /// Failed to bind to address.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Address(addr) => write!(f, "Invalid listen address: {}", addr),
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// Bind a TCP listener on `bind_address`.
pub async fn bind(bind_address: &str) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| ListenerError::Address(bind_address.to_string()))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(ListenerError::Bind)?;

    let local_addr = listener
        .local_addr()
        .map_err(ListenerError::Bind)?;

    tracing::info!(
        address = %local_addr,
        "Listener bound"
    );

    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bad_address() {
        let err = bind("localhost-ish").await.unwrap_err();
        assert!(matches!(err, ListenerError::Address(_)));
    }

    #[tokio::test]
    async fn test_address_in_use() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();
        let err = bind(&taken).await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind(_)));
    }
}
