//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_bridge_requests_total` (counter): requests by method and status
//! - `http_bridge_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is optional (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "http_bridge_requests_total",
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "http_bridge_request_duration_seconds",
        "method" => method,
        "status" => status
    )
    .record(started.elapsed().as_secs_f64());
}
