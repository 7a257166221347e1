//! Self-instrumentation and the Prometheus endpoint.
//!
//! # Metrics
//! - `upstream_check_cycle_duration_seconds` (histogram): wall time per cycle
//! - `upstream_check_endpoints` (gauge): endpoints attempted in the last cycle
//! - `upstream_check_errors_total` (counter): failed endpoints by error kind

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of one collection cycle.
pub fn record_cycle(duration: Duration, endpoints: usize) {
    metrics::histogram!("upstream_check_cycle_duration_seconds").record(duration.as_secs_f64());
    metrics::gauge!("upstream_check_endpoints").set(endpoints as f64);
}

/// Count a failed endpoint.
pub fn record_endpoint_error(kind: &'static str) {
    metrics::counter!("upstream_check_errors_total", "kind" => kind).increment(1);
}
