//! Process lifecycle.
//!
//! # Responsibilities
//! - Coordinate graceful shutdown across the reconcile loop and the
//!   liveness server
//! - Translate OS signals into the internal shutdown event

pub mod shutdown;

pub use shutdown::Shutdown;
