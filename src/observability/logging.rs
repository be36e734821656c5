//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the default level from the debug switch
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the configured default
//! - JSON format when requested, human-readable otherwise
//! - Logs go to stderr; stdout is reserved for the version banner

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directives for the given configuration.
pub fn default_directives(config: &ObservabilityConfig) -> &'static str {
    if config.debug {
        "strongbox=debug,tower_http=debug"
    } else {
        "strongbox=info,tower_http=warn"
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
