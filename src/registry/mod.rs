//! Source-of-truth registry subsystem.
//!
//! After the provider converges a load balancer, its assigned public endpoint
//! is written back here so dependent workloads can discover it.
//!
//! # Design Decisions
//! - Write-back is idempotent overwrite: repeating a call with the same
//!   endpoint is harmless, and the last write wins on collisions
//! - The registry is a trait so the loop can be exercised against stubs

use async_trait::async_trait;
use thiserror::Error;

pub mod client;

pub use client::RegistryClient;

/// Error type for registry write-back calls.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("no workload found for service '{service}' in stack '{stack}'")]
    WorkloadNotFound { service: String, stack: String },

    #[error("invalid registry URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Associates provider-assigned endpoints with workload records.
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Record `endpoint` as the public endpoint of the workload identified by
    /// `(service, stack)`.
    async fn associate_endpoint(
        &self,
        service: &str,
        stack: &str,
        endpoint: &str,
    ) -> Result<(), RegistryError>;
}
