//! Prometheus metrics for the overwrite engine.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// Starts an HTTP listener exposing `/metrics`. Must be called from within a
/// Tokio runtime.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record the end of an overwrite run.
///
/// * `underlying` - Ticker evaluated
/// * `outcome` - `submitted`, `dry_run`, `no_eligible_contracts`, `insufficient_shares` or `error`
pub fn record_overwrite_run(underlying: &str, outcome: &str) {
    counter!(
        "overwrite_runs_total",
        "underlying" => underlying.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a risk gate decision (`authorized` or a violation reason).
pub fn record_risk_gate_decision(result: &str) {
    counter!("risk_gate_decisions_total", "result" => result.to_string()).increment(1);
}

/// Update the eligible contracts gauge for an underlying.
pub fn record_eligible_contracts(underlying: &str, count: usize) {
    gauge!("eligible_contracts", "underlying" => underlying.to_string()).set(count as f64);
}
