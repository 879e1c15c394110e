//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cafe_requests_total` (counter): requests by method, status, operation
//! - `cafe_request_duration_seconds` (histogram): latency by operation
//!
//! Unmatched requests are labelled with operation `none`.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, operation: &str, start: Instant) {
    metrics::counter!(
        "cafe_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
    metrics::histogram!("cafe_request_duration_seconds", "operation" => operation.to_string())
        .record(start.elapsed().as_secs_f64());
}
