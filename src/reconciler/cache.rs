//! Last-applied snapshot cache.
//!
//! Holds exactly one snapshot: the last desired state that was dispatched to
//! the provider. The reconcile loop diffs fresh snapshots against it to
//! decide whether the provider needs to be called at all.
//!
//! # Design Decisions
//! - Owned by the loop task alone; no locking
//! - Replaced only after a dispatch attempt (success or failure), so a
//!   snapshot that never reached the provider can never suppress a retry
//! - Lost on restart: the first pass after startup always reconciles

use crate::model::Snapshot;

/// Cache of the last snapshot dispatched to the provider.
#[derive(Debug, Default)]
pub struct ConfigCache {
    snapshot: Snapshot,
}

impl ConfigCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last dispatched snapshot; empty if nothing was dispatched yet.
    pub fn get(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether `candidate` is structurally identical to the cached snapshot.
    ///
    /// Order of frontends and target pools is significant.
    pub fn matches(&self, candidate: &Snapshot) -> bool {
        self.snapshot == *candidate
    }

    /// Unconditionally replace the cached snapshot.
    pub fn replace(&mut self, candidate: Snapshot) {
        self.snapshot = candidate;
    }
}
