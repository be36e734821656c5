//! Network security for the Consul connection.
//!
//! # Data Flow
//! ```text
//! CA bundle path / --no-verify flag
//!     → tls.rs (PEM decode, X.509 checks)
//!     → TrustPolicy (immutable)
//!     → BackendClient TLS configuration
//! ```
//!
//! # Design Decisions
//! - Any problem with a configured bundle is fatal before serving
//! - Non-certificate PEM blocks are tolerated and skipped

pub mod tls;

pub use tls::{TrustPolicy, TrustStoreError};
