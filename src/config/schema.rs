//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default listening port when none is configured.
pub const DEFAULT_PORT: u16 = 8000;

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, keep-alive).
    pub listener: ListenerConfig,

    /// CORS policy applied to every response.
    pub cors: CorsConfig,

    /// How inbound requests are turned into outbound ones.
    pub forwarding: ForwardingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Rebind the listener to `0.0.0.0:<port>`.
    pub fn with_port(mut self, port: u16) -> Self {
        self.listener.bind_address = format!("0.0.0.0:{}", port);
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Keep inbound HTTP/1 connections open between requests.
    pub keep_alive: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{}", DEFAULT_PORT),
            keep_alive: false,
        }
    }
}

/// Cross-origin resource sharing policy.
///
/// A single `"*"` entry in any list means "allow anything".
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
        }
    }
}

/// Which inbound headers are copied onto the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
    /// Copy every header, Host included.
    #[default]
    Verbatim,
    /// Drop hop-by-hop headers and Host before forwarding.
    StripHopByHop,
}

/// Forwarding behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Header pass-through policy.
    pub header_policy: HeaderPolicy,

    /// Largest url-encoded POST body accepted, in bytes.
    pub max_form_bytes: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            header_policy: HeaderPolicy::Verbatim,
            max_form_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one upstream exchange (send plus body read) in seconds.
    /// Unset means no deadline.
    pub upstream_secs: Option<u64>,

    /// Grace period for in-flight requests during shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: None,
            shutdown_grace_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
