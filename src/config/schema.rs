//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Service name monitored when none is configured.
pub const DEFAULT_SERVICE: &str = "vault";

/// Root configuration for the strongbox gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, mount path).
    pub listener: ListenerConfig,

    /// Consul agent settings.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Limits applied to backend responses.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., ":8080" or "127.0.0.1:8080").
    /// An empty host binds all interfaces.
    pub bind_address: String,

    /// The single path served by the gateway.
    pub mount: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ":8080".to_string(),
            mount: "/strongbox".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Address in a form the socket layer accepts.
    pub fn bind_target(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

/// Consul agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URI of the local Consul agent.
    pub base_uri: String,

    /// Service whose health checks are translated.
    pub service: String,

    /// PEM bundle of the CA(s) that signed the Consul TLS certificates.
    pub ca_certificate: Option<String>,

    /// Skip verification of Consul TLS certificates.
    pub skip_verify: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_uri: "https://127.0.0.1:8500".to_string(),
            service: DEFAULT_SERVICE.to_string(),
            ca_certificate: None,
            skip_verify: false,
        }
    }
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Backend response limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest backend response body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit debug-level events for every request.
    pub debug: bool,

    /// Emit JSON lines instead of human-readable logs.
    pub json_logs: bool,
}
