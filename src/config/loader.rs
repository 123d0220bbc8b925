//! Settings loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ValidationError};

/// Environment variable holding the poll interval in milliseconds.
pub const POLL_INTERVAL_ENV: &str = "LB_POLL_INTERVAL";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse {var} '{value}' as an integer")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Apply the `LB_POLL_INTERVAL` environment override to loaded settings.
///
/// An unset variable leaves the configured interval in place; an unparseable
/// one is a startup error.
pub fn apply_poll_interval_env(settings: &mut Settings) -> Result<(), ConfigError> {
    match env::var(POLL_INTERVAL_ENV) {
        Ok(raw) => {
            settings.timing.poll_interval_ms = parse_poll_interval(&raw)?;
        }
        Err(_) => {
            tracing::info!(
                "Environment variable '{}' not set. Using poll interval {} ms",
                POLL_INTERVAL_ENV,
                settings.timing.poll_interval_ms
            );
        }
    }
    Ok(())
}

fn parse_poll_interval(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::Env {
        var: POLL_INTERVAL_ENV,
        value: raw.to_string(),
    })
}
