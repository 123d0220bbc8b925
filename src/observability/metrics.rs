//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_reconcile_passes_total` (counter): completed dispatch passes
//! - `lb_reconcile_duration_seconds` (histogram): dispatch + write-back time
//! - `lb_reconcile_noop_ticks_total` (counter): ticks gated off by the diff
//! - `lb_fetch_errors_total` (counter): version/snapshot fetch failures
//! - `lb_provider_errors_total` (counter): provider convergence failures
//! - `lb_writeback_errors_total` (counter): per-entry write-back failures

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_pass(duration: Duration) {
    counter!("lb_reconcile_passes_total").increment(1);
    histogram!("lb_reconcile_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_noop_tick() {
    counter!("lb_reconcile_noop_ticks_total").increment(1);
}

pub fn record_fetch_error() {
    counter!("lb_fetch_errors_total").increment(1);
}

pub fn record_provider_error() {
    counter!("lb_provider_errors_total").increment(1);
}

pub fn record_writeback_failures(count: u64) {
    counter!("lb_writeback_errors_total").increment(count);
}
