//! Consul wire types, the status model and error definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One element of `GET /v1/health/service/{name}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthRecord {
    #[serde(rename = "Service")]
    pub service: ServiceEntry,

    #[serde(rename = "Checks")]
    pub checks: Vec<HealthCheck>,
}

/// The service registration a health record describes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceEntry {
    #[serde(rename = "Service")]
    pub name: String,

    #[serde(rename = "Address")]
    pub address: String,

    /// Consul does not range-check ports, so neither do we.
    #[serde(rename = "Port")]
    pub port: i64,
}

/// A single health check attached to a record.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthCheck {
    #[serde(rename = "ServiceName")]
    pub service_name: String,

    #[serde(rename = "Status")]
    pub status: String,
}

impl ServiceEntry {
    /// Canonical endpoint key, e.g. `https://10.0.0.1:8200`.
    pub fn endpoint(&self) -> String {
        format!("https://{}:{}", self.address, self.port)
    }
}

/// Two-state classification of a Vault node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SealState {
    Sealed,
    Unsealed,
}

impl SealState {
    /// Only an exact `passing` counts as unsealed; anything else fails closed.
    pub fn from_check_status(status: &str) -> Self {
        if status == "passing" {
            SealState::Unsealed
        } else {
            SealState::Sealed
        }
    }
}

/// Endpoint key → seal state, as served to clients.
pub type StatusMap = BTreeMap<String, SealState>;

/// Errors that can occur while fetching or translating backend data.
///
/// Every variant is reported to the client as a 500 with its message.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend URL could not be built from the configured base URI.
    #[error("invalid consul URI '{uri}': {reason}")]
    RequestConstruction { uri: String, reason: String },

    /// Connection, TLS or timeout failure.
    #[error("{0}")]
    Unreachable(String),

    /// The backend answered with something other than 200.
    #[error("backend service discovery failure")]
    DiscoveryFailure { status: u16 },

    /// The response body could not be read in full.
    #[error("failed to read consul response: {0}")]
    ReadFailed(String),

    /// The response body exceeded the configured cap.
    #[error("consul response exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The body was not a JSON array of health records.
    #[error("{0}")]
    PayloadMalformed(#[from] serde_json::Error),

    /// Two records resolved to the same endpoint.
    #[error("backend data corruption detected")]
    DataCorrupted,
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Render an error with its whole `source()` chain, separated by `: `.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
