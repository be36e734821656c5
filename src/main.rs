//! strongbox
//!
//! Answers "which Vault nodes are sealed?" from Consul's health API.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                  STRONGBOX                   │
//!                       │                                              │
//!   GET /strongbox      │  ┌─────────┐   ┌─────────┐   ┌───────────┐  │
//!   ────────────────────┼─▶│  http   │──▶│ backend │──▶│  consul   │──┼──▶ Consul agent
//!                       │  │ handler │   │ client  │   │ TLS trust │  │    /v1/health/service/vault
//!                       │  └────┬────┘   └────┬────┘   └───────────┘  │
//!                       │       │             ▼                        │
//!   {"https://..":      │       │      ┌────────────┐                  │
//!    "unsealed"}        │       │      │ translate  │                  │
//!   ◀───────────────────┼───────┴──────│ (records → │                  │
//!                       │              │ status map)│                  │
//!                       │              └────────────┘                  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use strongbox::config::cli::version_banner;
use strongbox::config::Cli;
use strongbox::lifecycle::{signals, startup, Shutdown};
use strongbox::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
                _ => startup::EXIT_CONFIG,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if cli.wants_version() {
        println!("{}", version_banner());
        return ExitCode::SUCCESS;
    }

    let config = match startup::resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("!!! {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "strongbox starting");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    match startup::run(config, shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "strongbox failed");
            ExitCode::from(e.exit_code())
        }
    }
}
