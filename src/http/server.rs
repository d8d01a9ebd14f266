//! HTTP server lifecycle.
//!
//! # Responsibilities
//! - Build the Axum router: GET/POST handlers behind tracing and CORS layers
//! - Serve HTTP/1.1 connections on a background accept task
//! - Honor the keep-alive flag per connection
//! - Graceful shutdown bounded by the configured grace period
//! - Notify the owner's crash channel when the accept task dies unexpectedly
//!
//! # States
//! ```text
//! Stopped --start()--> Running --shutdown()--> Stopped
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::error::LifecycleError;
use crate::http::cors::cors_layer;
use crate::http::handlers::AppState;
use crate::lifecycle::CrashNotifier;
use crate::net::connection::ConnectionId;
use crate::net::listener;
use crate::routing::proxy_routes;
use crate::upstream::{ReqwestTransport, RequestForwarder, UpstreamTransport};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Handle to a running accept task.
struct ServerInstance {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// The forwarding proxy server.
pub struct ProxyServer {
    config: Arc<ProxyConfig>,
    transport: Arc<dyn UpstreamTransport>,
    instance: Option<ServerInstance>,
}

impl ProxyServer {
    /// Create a server that forwards through a `reqwest` client.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let deadline = config.timeouts.upstream_secs.map(Duration::from_secs);
        let transport = Arc::new(ReqwestTransport::new(deadline)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a server that forwards through `transport`.
    pub fn with_transport(config: ProxyConfig, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            instance: None,
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.instance.is_some()
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        let forwarder = RequestForwarder::new(
            Arc::clone(&self.transport),
            self.config.forwarding.header_policy,
        );
        let state = AppState::new(forwarder, self.config.forwarding.max_form_bytes);

        proxy_routes(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.config.cors))
    }

    /// Start serving on a background task.
    ///
    /// Returns as soon as the task is spawned; binding happens on the task.
    /// If the task later exits for any reason other than [`shutdown`], one
    /// message is sent on `crash_signal` without blocking.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// [`shutdown`]: ProxyServer::shutdown
    pub fn start(
        &mut self,
        crash_signal: Option<mpsc::Sender<()>>,
        keep_alive: bool,
    ) -> Result<(), LifecycleError> {
        if self.instance.is_some() {
            return Err(LifecycleError::AlreadyStarted);
        }

        for site in &self.config.cors.allowed_origins {
            tracing::info!(site = %site, "CORS allowed origin");
        }
        for header in &self.config.cors.allowed_headers {
            tracing::info!(header = %header, "CORS allowed header");
        }
        for method in &self.config.cors.allowed_methods {
            tracing::info!(method = %method, "CORS allowed method");
        }

        let app = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let crash = CrashNotifier::new(crash_signal);
        let addr = self.config.listener.bind_address.clone();

        let task = tokio::spawn(serve(addr, app, keep_alive, shutdown_rx, crash));

        self.instance = Some(ServerInstance { shutdown_tx, task });
        Ok(())
    }

    /// Stop accepting and drain in-flight requests.
    ///
    /// Connections still open when the grace period ends are closed. The
    /// server is stopped afterwards whatever the drain outcome.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        let ServerInstance { shutdown_tx, mut task } =
            self.instance.take().ok_or(LifecycleError::NotStarted)?;
        let addr = &self.config.listener.bind_address;
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        tracing::info!(addr = %addr, "Proxy server is shutting down");

        // The task may already be gone after a crash.
        let _ = shutdown_tx.send(());

        match tokio::time::timeout(grace, &mut task).await {
            Ok(Ok(())) => {
                tracing::info!(addr = %addr, "Proxy server shutdown successful");
            }
            Ok(Err(e)) => {
                tracing::error!(addr = %addr, error = %e, "Proxy server shutdown failed");
            }
            Err(_) => {
                tracing::error!(
                    addr = %addr,
                    grace_secs = grace.as_secs(),
                    "Proxy server shutdown failed: grace period elapsed, closing remaining connections"
                );
                task.abort();
            }
        }

        Ok(())
    }
}

/// Accept loop. Runs until `shutdown_rx` fires (or its sender is dropped).
async fn serve(
    addr: String,
    app: Router,
    keep_alive: bool,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut crash: CrashNotifier,
) {
    let listener = match listener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, cause = %e, "Proxy server stopped");
            return;
        }
    };

    tracing::info!(addr = %addr, keep_alive, "Proxy server started");

    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new()).keep_alive(keep_alive);

    let graceful = GracefulShutdown::new();
    // Dropping the set (task abort) closes every remaining connection.
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let id = ConnectionId::new();
                    tracing::debug!(connection = %id, peer = %peer, "Connection accepted");

                    let service = TowerToHyperService::new(app.clone());
                    let conn = builder.serve_connection(TokioIo::new(stream), service);
                    let conn = graceful.watch(conn);

                    connections.spawn(async move {
                        if let Err(e) = conn.await {
                            tracing::error!(connection = %id, peer = %peer, error = %e, "Write response failed");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(addr = %addr, error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown_rx => break,
        }
    }

    crash.disarm();
    drop(listener);
    tracing::info!(addr = %addr, "Proxy server stopped accepting connections");

    graceful.shutdown().await;
    while connections.join_next().await.is_some() {}
}
