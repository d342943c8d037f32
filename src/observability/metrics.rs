//! Bootstrap metrics.
//!
//! # Metrics
//! - `bootstrap_steps_total` (counter): step runs by step, outcome
//! - `bootstrap_step_duration_seconds` (histogram): time spent per step
//! - `bootstrap_ready` (gauge): 1 once every step completed, 0 otherwise
//!
//! Recording is a no-op until a recorder is installed, so the lifecycle
//! code and its tests can call these unconditionally.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    set_ready(false);
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the outcome of one step run.
pub fn record_step(step: &str, success: bool, elapsed: Duration) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "bootstrap_steps_total",
        "step" => step.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("bootstrap_step_duration_seconds", "step" => step.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn set_ready(ready: bool) {
    metrics::gauge!("bootstrap_ready").set(if ready { 1.0 } else { 0.0 });
}
