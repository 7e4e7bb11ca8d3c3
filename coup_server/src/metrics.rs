//! Prometheus metrics for monitoring server health and room activity.
//!
//! Metrics are exposed in Prometheus text format for scraping; see
//! [`init_metrics`] for the exporter setup.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize the Prometheus metrics exporter. Metrics become
/// available at `http://<addr>/metrics`.
///
/// # Errors
///
/// Returns an error if the exporter cannot bind `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

/// Record one completed HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

/// Record matchmaking latency in milliseconds, from request receipt to
/// the player being seated (or placed in a fresh room).
pub fn matchmake_latency_ms(duration_ms: f64) {
    metrics::histogram!("matchmake_latency_ms").record(duration_ms);
}

/// Set the current number of open rooms.
pub fn active_rooms(count: usize) {
    metrics::gauge!("active_rooms").set(count as f64);
}

/// Increment the idle-room eviction counter.
pub fn rooms_evicted_total(count: usize) {
    metrics::counter!("rooms_evicted_total").increment(count as u64);
}
