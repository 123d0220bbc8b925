//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! Timer tick (runner.rs):
//!     fetch version
//!     → changed, or force interval elapsed?
//!     → fetch snapshot
//!     → diff against cache (cache.rs)
//!     → dispatch to provider
//!     → write endpoints back to registry (writeback.rs)
//!     → replace cache, reset force timer
//! ```
//!
//! # Design Decisions
//! - One sequential task owns all loop state; passes never overlap
//! - Per-tick errors are logged and abandoned, never escalated: the fixed
//!   poll interval is the retry policy
//! - The force interval is the upper bound on how long provider-side drift
//!   can survive

pub mod cache;
pub mod runner;
pub mod writeback;

pub use cache::ConfigCache;
pub use runner::Reconciler;
pub use writeback::{write_back, WriteBackStats};
