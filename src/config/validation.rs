//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0)
//! - Check bind addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::Settings;

/// A single semantic settings violation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("force update interval must be greater than zero")]
    ZeroForceInterval,

    #[error("provider name must not be empty")]
    EmptyProviderName,

    #[error("invalid bind address '{0}'")]
    BindAddress(String),
}

/// Validate settings, collecting every violation.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.timing.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }
    if settings.timing.force_update_interval_secs == 0 {
        errors.push(ValidationError::ZeroForceInterval);
    }
    if settings.provider.name.trim().is_empty() {
        errors.push(ValidationError::EmptyProviderName);
    }
    if settings.health.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            settings.health.bind_address.clone(),
        ));
    }
    if settings.observability.metrics_enabled
        && settings
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::BindAddress(
            settings.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
