//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the listener address and CORS entries
//! - Validate value ranges (grace period > 0, form limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid CORS origin '{0}'")]
    CorsOrigin(String),

    #[error("invalid CORS header '{0}'")]
    CorsHeader(String),

    #[error("invalid CORS method '{0}'")]
    CorsMethod(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::CorsOrigin(origin.clone()));
        }
    }

    for header in &config.cors.allowed_headers {
        if header != "*" && HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::CorsHeader(header.clone()));
        }
    }

    for method in &config.cors.allowed_methods {
        if method != "*" && Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::CorsMethod(method.clone()));
        }
    }

    if config.timeouts.shutdown_grace_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.shutdown_grace_secs"));
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }
    if config.forwarding.max_form_bytes == 0 {
        errors.push(ValidationError::Zero("forwarding.max_form_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.cors.allowed_headers = vec!["bad header".into()];
        config.cors.allowed_methods = vec!["GET".into(), "BAD METHOD".into()];
        config.timeouts.shutdown_grace_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::CorsHeader("bad header".into()),
                ValidationError::CorsMethod("BAD METHOD".into()),
                ValidationError::Zero("timeouts.shutdown_grace_secs"),
            ]
        );
    }

    #[test]
    fn test_origin_with_newline_rejected() {
        let mut config = ProxyConfig::default();
        config.cors.allowed_origins = vec!["https://ok.example".into(), "bad\norigin".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::CorsOrigin("bad\norigin".into())]);
    }
}
