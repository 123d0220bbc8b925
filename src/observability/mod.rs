//! Observability subsystem.
//!
//! # Responsibilities
//! - Initialize structured logging (level, destination)
//! - Install the Prometheus metrics exporter
//! - Provide recording helpers for the reconcile loop
//!
//! # Design Decisions
//! - All non-fatal errors surface through logs; there is no alerting channel
//! - The metrics exporter runs its own listener, separate from the liveness
//!   endpoint

pub mod logging;
pub mod metrics;
