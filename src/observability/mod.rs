//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, request span)
//!     → logging.rs subscriber (stderr, text or JSON)
//!
//! Debug-level events mark the request pipeline:
//!     inbound request → consul query → consul response → response sent
//! ```
//!
//! # Design Decisions
//! - Logging is a side channel; nothing depends on it for correctness
//! - Request ID flows through the request span

pub mod logging;

pub use logging::init_logging;
