//! Desired-state source subsystem.
//!
//! # Data Flow
//! ```text
//! reconcile tick
//!     → version()  (cheap change pre-filter)
//!     → snapshot() (full desired state, only when version moved or forced)
//!     → Snapshot handed to the diff/dispatch pipeline
//! ```
//!
//! # Design Decisions
//! - The version token is opaque: equality-compared only, never ordered
//! - The source is a trait so the loop can be exercised against stubs

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Snapshot;

pub mod client;

pub use client::MetadataClient;

/// Error type for desired-state fetches.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid metadata URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

/// A source of desired load balancer state.
#[async_trait]
pub trait DesiredStateSource: Send + Sync {
    /// Fetch the current version token.
    async fn version(&self) -> Result<String, MetadataError>;

    /// Fetch the full desired-state snapshot.
    async fn snapshot(&self) -> Result<Snapshot, MetadataError>;
}
