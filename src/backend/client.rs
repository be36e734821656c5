//! Consul health API client.
//!
//! # Responsibilities
//! - Build one HTTP client with the resolved TLS trust policy
//! - Issue exactly one `GET /v1/health/service/{name}` per call (no retries)
//! - Bound the call with connect/request timeouts and a body size cap
//! - Classify failures into `BackendError` variants

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Certificate, StatusCode};
use url::Url;

use crate::backend::translate::translate;
use crate::backend::types::{error_chain, BackendError, BackendResult, StatusMap};
use crate::config::GatewayConfig;
use crate::net::tls::{TrustPolicy, TrustStoreError};

/// Shared, read-only handle to the Consul agent.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_uri: String,
    service: String,
    max_body_bytes: usize,
}

impl BackendClient {
    /// Create a client for the configured agent using the given trust policy.
    pub fn new(config: &GatewayConfig, trust: &TrustPolicy) -> Result<Self, TrustStoreError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(concat!("strongbox/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs));

        builder = match trust {
            TrustPolicy::SystemDefault => builder,
            TrustPolicy::SkipVerification => builder.danger_accept_invalid_certs(true),
            TrustPolicy::ExplicitCaBundle(certs) => {
                builder = builder.tls_built_in_root_certs(false);
                for der in certs {
                    let cert = Certificate::from_der(der.as_ref())
                        .map_err(|e| TrustStoreError::Client(error_chain(&e)))?;
                    builder = builder.add_root_certificate(cert);
                }
                builder
            }
        };

        let http = builder
            .build()
            .map_err(|e| TrustStoreError::Client(error_chain(&e)))?;

        if Url::parse(&config.backend.base_uri).is_err() {
            tracing::warn!(
                base_uri = %config.backend.base_uri,
                "Consul base URI does not parse; every request will fail until it is fixed"
            );
        }

        Ok(Self {
            http,
            base_uri: config.backend.base_uri.clone(),
            service: config.backend.service.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        })
    }

    /// Name of the monitored service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The health endpoint for the monitored service.
    pub fn health_url(&self) -> BackendResult<Url> {
        let raw = format!(
            "{}/v1/health/service/{}",
            self.base_uri.trim_end_matches('/'),
            self.service
        );
        let url = Url::parse(&raw).map_err(|e| BackendError::RequestConstruction {
            uri: raw.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BackendError::RequestConstruction {
                uri: raw,
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Fetch the raw health payload.
    pub async fn fetch_health(&self) -> BackendResult<Vec<u8>> {
        let url = self.health_url()?;
        tracing::debug!(url = %url, "Querying consul");

        let mut response = self
            .http
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    BackendError::RequestConstruction {
                        uri: url.to_string(),
                        reason: error_chain(&e),
                    }
                } else {
                    BackendError::Unreachable(error_chain(&e))
                }
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "Received consul response");
        if status != StatusCode::OK {
            return Err(BackendError::DiscoveryFailure {
                status: status.as_u16(),
            });
        }

        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(BackendError::PayloadTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| BackendError::ReadFailed(error_chain(&e)))?
        {
            if body.len() + chunk.len() > limit {
                return Err(BackendError::PayloadTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            bytes = body.len(),
            body = %String::from_utf8_lossy(&body),
            "Read consul response body"
        );
        Ok(body)
    }

    /// Fetch and translate in one step.
    pub async fn fetch_statuses(&self) -> BackendResult<StatusMap> {
        let body = self.fetch_health().await?;
        translate(&body, &self.service)
    }
}
