//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UtilConfig → Result<(), Vec<ValidationError>>

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

use crate::config::schema::{TrustMode, UtilConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("forwarded.trusted_proxies entry {0:?} is not an IP address")]
    InvalidTrustedProxy(String),

    #[error("forwarded.trust = \"peers\" requires at least one trusted proxy")]
    NoTrustedProxies,

    #[error("body.max_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.log_level {0:?} is not a log level")]
    InvalidLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &UtilConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for proxy in &config.forwarded.trusted_proxies {
        if proxy.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidTrustedProxy(proxy.clone()));
        }
    }
    if config.forwarded.trust == TrustMode::Peers && config.forwarded.trusted_proxies.is_empty() {
        errors.push(ValidationError::NoTrustedProxies);
    }

    if config.body.max_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
