//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → command line overrides (port)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the server and handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server is constructed
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, ForwardingConfig, HeaderPolicy, ListenerConfig, ObservabilityConfig, ProxyConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
