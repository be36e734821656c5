//! Consul backend subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → client.rs (one GET /v1/health/service/{name}, TLS per trust policy)
//!     → raw bytes or BackendError
//!     → translate.rs (records → StatusMap, duplicate detection)
//!     → StatusMap or BackendError
//! ```
//!
//! # Design Decisions
//! - No caching, no retries: every inbound request triggers one fetch
//! - The client is immutable after startup and shared without locks
//! - Every failure is a `BackendError`; the HTTP layer owns status mapping

pub mod client;
pub mod translate;
pub mod types;

pub use client::BackendClient;
pub use translate::translate;
pub use types::{BackendError, BackendResult, HealthRecord, SealState, StatusMap};
