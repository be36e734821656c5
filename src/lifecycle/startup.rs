//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve configuration (defaults → TOML file → flags) and validate it
//! - Load the CA bundle and build the backend client
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, with a distinct exit code
//! - The listener binds last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::backend::BackendClient;
use crate::config::loader::{read_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::{Cli, GatewayConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::tls::{TrustPolicy, TrustStoreError};

/// Process exit code for argument and configuration problems.
pub const EXIT_CONFIG: u8 = 1;
/// Process exit code for certificate-loading problems.
pub const EXIT_CERTIFICATES: u8 = 2;

/// Anything that stops the gateway before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    TrustStore(#[from] TrustStoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::TrustStore(_) => EXIT_CERTIFICATES,
            _ => EXIT_CONFIG,
        }
    }
}

/// Build the effective configuration for this invocation.
pub fn resolve_config(cli: &Cli) -> Result<GatewayConfig, StartupError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply_to(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Prepare the backend client: trust store first, then the HTTP client.
pub fn build_backend(config: &GatewayConfig) -> Result<BackendClient, StartupError> {
    let trust = TrustPolicy::from_config(&config.backend)?;
    tracing::info!(trust = %trust.describe(), "Consul TLS trust configured");
    Ok(BackendClient::new(config, &trust)?)
}

/// Serve until `shutdown` fires.
pub async fn run(config: GatewayConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let backend = build_backend(&config)?;

    let address = config.listener.bind_target();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        bind = %config.listener.bind_address,
        mount = %config.listener.mount,
        consul = %config.backend.base_uri,
        "Binding for inbound requests"
    );

    HttpServer::new(config, backend)
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cli = Cli::try_parse_from(["strongbox"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap(), GatewayConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:7000\"\nmount = \"/from-file\"").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["strongbox", "--config", &path, "-m", "/from-flag"]).unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.listener.mount, "/from-flag");
    }

    #[test]
    fn test_invalid_flag_value_is_config_error() {
        let cli = Cli::try_parse_from(["strongbox", "-m", "relative"]).unwrap();
        let err = resolve_config(&cli).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["strongbox", "--config", "/nonexistent/strongbox.toml"]).unwrap();
        let err = resolve_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_bad_bundle_exits_with_certificate_code() {
        let mut config = GatewayConfig::default();
        config.backend.ca_certificate = Some("/nonexistent/ca.pem".into());

        let err = build_backend(&config).unwrap_err();
        assert!(matches!(err, StartupError::TrustStore(_)));
        assert_eq!(err.exit_code(), EXIT_CERTIFICATES);
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = GatewayConfig::default();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = run(config, Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
