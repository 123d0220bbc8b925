//! Pluggable load balancer providers.
//!
//! A provider converges real infrastructure toward a desired-state snapshot
//! and reports the public endpoint assigned to each load balancer. Providers
//! are selected by name at startup from a fixed factory table; an unknown
//! name is a startup error.
//!
//! # Design Decisions
//! - `apply` returns an outcome *and* an optional error: a provider may
//!   converge part of the snapshot before failing, and whatever succeeded
//!   still flows to write-back
//! - Implementations must be idempotent: applying the same snapshot twice
//!   yields the same endpoints and creates no duplicate infrastructure

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{LBConfig, Snapshot};

pub mod rest;

/// Name of the provider used when none is selected.
pub const DEFAULT_PROVIDER: &str = "rest";

/// Error type for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider '{0}'")]
    Unknown(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider API returned status {status} for '{name}'")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },

    #[error("{failed} of {total} load balancers failed to converge")]
    Partial { failed: usize, total: usize },

    #[error("invalid provider URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Result of one convergence attempt.
///
/// `endpoints` maps each assigned public endpoint to the configuration that
/// produced it. A partial map may accompany an error; the two are not
/// mutually exclusive.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub endpoints: BTreeMap<String, LBConfig>,
    pub error: Option<ProviderError>,
}

/// Capability interface implemented by every provider.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Provider name as registered in the factory table.
    fn name(&self) -> &'static str;

    /// Converge infrastructure toward `desired` and report assigned
    /// endpoints.
    async fn apply(&self, desired: &Snapshot) -> ApplyOutcome;
}

type Factory = fn() -> Result<Box<dyn Provider>, ProviderError>;

fn rest_factory() -> Result<Box<dyn Provider>, ProviderError> {
    Ok(Box::new(rest::RestProvider::from_env()?))
}

/// Named provider factories, resolved once at startup.
static FACTORIES: &[(&str, Factory)] = &[(rest::PROVIDER_NAME, rest_factory)];

/// Construct the provider registered under `name`.
pub fn create(name: &str) -> Result<Box<dyn Provider>, ProviderError> {
    FACTORIES
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, factory)| factory())
        .unwrap_or_else(|| Err(ProviderError::Unknown(name.to_string())))
}
