//! Command-line surface.
//!
//! Flags override values from the optional TOML file, which in turn override
//! the built-in defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::schema::GatewayConfig;

/// Re-publishes Vault seal status from Consul health checks.
#[derive(Parser, Debug)]
#[command(name = "strongbox")]
#[command(long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Print (useful) debugging messages to stderr.
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// IP address and port to bind on. Omit the address to bind all
    /// interfaces. [default: :8080]
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Base URI of the local Consul agent. [default: https://127.0.0.1:8500]
    #[arg(short, long, value_name = "URI")]
    pub consul: Option<String>,

    /// Full path to the certificate for the CA that has signed the Consul
    /// TLS certificates.
    #[arg(short = 'C', long = "ca-certificate", visible_alias = "ca-cert", value_name = "PATH")]
    pub ca_certificate: Option<PathBuf>,

    /// Don't perform verification of Consul TLS certificates (instead of
    /// specifying `-C`).
    #[arg(short = 'N', long = "no-verify")]
    pub no_verify: bool,

    /// Root (relative) URI at which to mount the strongbox API.
    /// [default: /strongbox]
    #[arg(short, long, value_name = "PATH")]
    pub mount: Option<String>,

    /// Optional TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print version information and exit.
    #[arg(short = 'v', long)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print version information and exit.
    Version,
}

impl Cli {
    /// Whether the invocation only asks for the version banner.
    pub fn wants_version(&self) -> bool {
        self.version || self.command == Some(Command::Version)
    }

    /// Apply command-line overrides on top of a base configuration.
    pub fn apply_to(&self, config: &mut GatewayConfig) {
        if self.debug {
            config.observability.debug = true;
        }
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(consul) = &self.consul {
            config.backend.base_uri = consul.clone();
        }
        if let Some(ca) = &self.ca_certificate {
            config.backend.ca_certificate = Some(ca.to_string_lossy().into_owned());
        }
        if self.no_verify {
            config.backend.skip_verify = true;
        }
        if let Some(mount) = &self.mount {
            config.listener.mount = mount.clone();
        }
    }
}

/// Version banner printed by `-v`, `--version` and `version`.
pub fn version_banner() -> String {
    format!("strongbox v{}", env!("CARGO_PKG_VERSION"))
}
