//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_upstream_failures_total` (counter): failed exchanges by kind
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus endpoint is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one handled request.
pub fn record_request(method: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("proxy_requests_total", "method" => method, "status" => status.clone())
        .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream exchange that did not produce a relayable response.
pub fn record_upstream_failure(kind: &'static str) {
    metrics::counter!("proxy_upstream_failures_total", "kind" => kind).increment(1);
}
