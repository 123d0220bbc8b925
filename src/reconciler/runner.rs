//! The reconciliation loop.
//!
//! # Responsibilities
//! - Poll the metadata version on a fixed interval
//! - Decide per tick whether a full reconciliation is needed
//! - Fetch, diff, dispatch to the provider, and drive endpoint write-back
//! - Re-assert desired state periodically even when nothing changed
//!
//! # Design Decisions
//! - The version token is a cheap pre-filter; the cached snapshot is the
//!   authoritative gate against dispatching, because version churn is
//!   decoupled from content churn
//! - The forced update self-heals provider-side drift: it bypasses the
//!   equality gate on a timer measured from the last successful pass
//! - Fetch errors abandon the tick; the fixed poll interval is the retry
//!   policy, no backoff

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use crate::metadata::DesiredStateSource;
use crate::observability::metrics;
use crate::provider::Provider;
use crate::reconciler::cache::ConfigCache;
use crate::reconciler::writeback::write_back;
use crate::registry::EndpointRegistry;

/// The reconciliation loop and all of its state.
///
/// One instance owns the cache, the last-seen version marker, and the force
/// timer; nothing else touches them.
pub struct Reconciler {
    source: Box<dyn DesiredStateSource>,
    provider: Box<dyn Provider>,
    registry: Box<dyn EndpointRegistry>,
    cache: ConfigCache,
    last_version: Option<String>,
    last_applied: Instant,
    poll_interval: Duration,
    force_interval: Duration,
}

impl Reconciler {
    /// Create a reconciler. The force timer starts at construction, so an
    /// idle source still gets a pass within one force interval of startup.
    pub fn new(
        source: Box<dyn DesiredStateSource>,
        provider: Box<dyn Provider>,
        registry: Box<dyn EndpointRegistry>,
        poll_interval: Duration,
        force_interval: Duration,
    ) -> Self {
        Self {
            source,
            provider,
            registry,
            cache: ConfigCache::new(),
            last_version: None,
            last_applied: Instant::now(),
            poll_interval,
            force_interval,
        }
    }

    /// Run the loop until shutdown.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            provider = self.provider.name(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            force_update_interval_secs = self.force_interval.as_secs(),
            "Reconciler starting"
        );

        let mut ticker = time::interval(self.poll_interval);
        // A pass that outlives the interval must not trigger a catch-up
        // burst; late ticks collapse into the next one.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let pass = Uuid::new_v4();
                    self.tick()
                        .instrument(tracing::debug_span!("pass", id = %pass))
                        .await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Reconciler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Execute one reconciliation pass.
    pub async fn tick(&mut self) {
        let version = match self.source.version().await {
            Ok(version) => version,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch metadata version");
                metrics::record_fetch_error();
                return;
            }
        };

        let mut update = false;
        let mut forced = false;
        if self.last_version.as_deref() == Some(version.as_str()) {
            if self.last_applied.elapsed() >= self.force_interval {
                tracing::debug!(
                    interval_secs = self.force_interval.as_secs(),
                    "Version unchanged for the force interval, re-asserting desired state"
                );
                forced = true;
            }
        } else {
            tracing::debug!(
                old = self.last_version.as_deref().unwrap_or("<none>"),
                new = %version,
                "Metadata version changed"
            );
            self.last_version = Some(version);
            update = true;
        }

        if !update && !forced {
            return;
        }

        let snapshot = match self.source.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // The version marker already advanced; if the version now
                // goes quiet the force timer still guarantees a retry.
                tracing::error!(error = %e, "Failed to fetch desired state snapshot");
                metrics::record_fetch_error();
                return;
            }
        };

        // A flapping upstream can move the version token without changing
        // actual content. Diffing against the cache keeps spurious version
        // churn away from the rate-limited provider.
        if self.cache.matches(&snapshot) && !forced {
            tracing::debug!("Desired state did not change");
            metrics::record_noop_tick();
            return;
        }

        let started = Instant::now();
        tracing::info!(
            lbs = snapshot.len(),
            forced,
            "Dispatching desired state to provider"
        );

        let outcome = self.provider.apply(&snapshot).await;
        if let Some(e) = &outcome.error {
            tracing::error!(error = %e, "Provider failed to fully converge");
            metrics::record_provider_error();
        }

        let stats = write_back(self.registry.as_ref(), &outcome.endpoints).await;
        if stats.failed > 0 {
            metrics::record_writeback_failures(stats.failed as u64);
        }

        // The dispatch attempt, not write-back success, gates the cache
        // update: the attempted snapshot becomes the comparison baseline.
        self.cache.replace(snapshot);
        self.last_applied = Instant::now();
        metrics::record_pass(started.elapsed());

        tracing::info!(
            endpoints = outcome.endpoints.len(),
            writeback_attempted = stats.attempted,
            writeback_failed = stats.failed,
            "Reconciliation pass complete"
        );
    }
}
