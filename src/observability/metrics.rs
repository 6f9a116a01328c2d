//! Metrics collection and exposition.
//!
//! # Metrics
//! - `unlock_requests_total` (counter): unlock attempts by outcome
//! - `unlock_duration_seconds` (histogram): time from upload to response
//! - `batch_files_total` (counter): batch files by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one `/unlock` request.
pub fn record_unlock(outcome: &'static str, started: Instant) {
    counter!("unlock_requests_total", "outcome" => outcome).increment(1);
    histogram!("unlock_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record the outcome of one batch file.
pub fn record_batch_file(outcome: &'static str) {
    counter!("batch_files_total", "outcome" => outcome).increment(1);
}
