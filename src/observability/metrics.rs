//! Metrics collection and exposition.
//!
//! # Metrics
//! - `probe_requests_total` (counter): requests by method, path, status
//! - `probe_request_duration_seconds` (histogram): latency distribution
//! - `probe_rejected_total` (counter): gate rejections by reason
//!
//! # Design Decisions
//! - Exporter runs on its own listener address, separate from the probe
//!   surface
//! - Recording is unconditional and cheap; exposition is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "probe_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("probe_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a protection-layer rejection.
pub fn record_rejection(reason: &'static str) {
    counter!("probe_rejected_total", "reason" => reason).increment(1);
}
