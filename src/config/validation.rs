//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body cap > 0)
//! - Check the mount path is routable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - A malformed backend URI is NOT a validation error; it surfaces per request

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bind address must not be empty")]
    EmptyBindAddress,

    #[error("mount path '{0}' must start with '/'")]
    MountNotAbsolute(String),

    #[error("mount path '{0}' must not contain '{{', '}}' or '*'")]
    MountHasWildcard(String),

    #[error("backend service name must not be empty")]
    EmptyService,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let mount = &config.listener.mount;
    if !mount.starts_with('/') {
        errors.push(ValidationError::MountNotAbsolute(mount.clone()));
    }
    if mount.contains(['{', '}', '*']) {
        errors.push(ValidationError::MountHasWildcard(mount.clone()));
    }

    if config.backend.service.trim().is_empty() {
        errors.push(ValidationError::EmptyService);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
