//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): forwarded requests by backend, strategy, status
//! - `dispatch_request_duration_seconds` (histogram): end-to-end latency per backend
//! - `dispatch_rejected_total` (counter): requests refused before forwarding, by reason
//!
//! Every recording call is a no-op until [`init_metrics`] installs a recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded request.
pub fn record_dispatch(backend: &str, strategy: &'static str, status: u16, start: Instant) {
    let backend = backend.to_string();
    metrics::counter!(
        "dispatch_requests_total",
        "backend" => backend.clone(),
        "strategy" => strategy,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "dispatch_request_duration_seconds",
        "backend" => backend,
        "strategy" => strategy
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request refused without forwarding.
pub fn record_rejection(reason: &'static str) {
    metrics::counter!("dispatch_rejected_total", "reason" => reason).increment(1);
}
