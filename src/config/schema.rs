//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::http::body::ContentTypeMatch;
use crate::http::remote::ForwardedPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UtilConfig {
    /// Listener settings for the demo server.
    pub server: ServerConfig,

    /// Trust boundary for the `X-Forwarded-For` header.
    pub forwarded: ForwardedConfig,

    /// Request body decoding.
    pub body: BodyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// When the forwarding header is believed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
    #[default]
    Always,
    Never,
    Peers,
}

/// Forwarding header configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardedConfig {
    pub trust: TrustMode,

    /// Proxy IPs trusted when `trust = "peers"`.
    pub trusted_proxies: Vec<String>,
}

impl ForwardedConfig {
    /// Build the runtime policy. Entries that are not IP addresses are
    /// skipped; `validate_config` reports them.
    pub fn policy(&self) -> ForwardedPolicy {
        match self.trust {
            TrustMode::Always => ForwardedPolicy::Always,
            TrustMode::Never => ForwardedPolicy::Never,
            TrustMode::Peers => ForwardedPolicy::Peers(
                self.trusted_proxies
                    .iter()
                    .filter_map(|p| p.parse::<IpAddr>().ok())
                    .collect(),
            ),
        }
    }
}

/// Body decoding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyConfig {
    /// How `Content-Type` is matched.
    pub content_type_match: ContentTypeMatch,

    /// Maximum accepted body size in bytes.
    pub max_bytes: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            content_type_match: ContentTypeMatch::Exact,
            max_bytes: 10 << 20,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
