//! Liveness surface.
//!
//! # Responsibilities
//! - Answer liveness probes while the process is up
//! - Stay independent of the reconcile loop: no shared data, no blocking
//!
//! # Design Decisions
//! - Reflects process liveness only, never reconciliation success/failure
//! - Reconciliation health is a log/metrics concern, not a probe concern

pub mod server;

pub use server::serve;
