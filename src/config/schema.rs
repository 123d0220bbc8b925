//! Configuration schema definitions.
//!
//! This module defines the complete settings structure for the controller.
//! All types derive Serde traits for deserialization from a settings file,
//! and every field has a default so a minimal (or absent) file works.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings for the controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Provider selection.
    pub provider: ProviderSettings,

    /// Reconciliation timing.
    pub timing: TimingSettings,

    /// Liveness endpoint settings.
    pub health: HealthSettings,

    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

/// Provider selection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Name of the external load balancer provider to converge through.
    pub name: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: crate::provider::DEFAULT_PROVIDER.to_string(),
        }
    }
}

/// Reconciliation timing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Poll interval in milliseconds. Overridable via `LB_POLL_INTERVAL`.
    pub poll_interval_ms: u64,

    /// Seconds since the last successful pass after which desired state is
    /// re-asserted even if nothing changed.
    pub force_update_interval_secs: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            force_update_interval_secs: 60,
        }
    }
}

/// Liveness endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Bind address for the liveness endpoint.
    pub bind_address: String,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Enable debug-level logging.
    pub debug: bool,

    /// Log file path; stderr when unset.
    pub log_file: Option<PathBuf>,

    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics exporter.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_file: None,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.provider.name, "rest");
        assert_eq!(settings.timing.poll_interval_ms, 1000);
        assert_eq!(settings.timing.force_update_interval_secs, 60);
        assert!(settings.observability.log_file.is_none());
        assert!(settings.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let raw = r#"
            [timing]
            poll_interval_ms = 250

            [observability]
            debug = true
        "#;
        let settings: Settings = toml::from_str(raw).unwrap();
        assert_eq!(settings.timing.poll_interval_ms, 250);
        assert_eq!(settings.timing.force_update_interval_secs, 60);
        assert!(settings.observability.debug);
        assert_eq!(settings.provider.name, "rest");
    }
}
