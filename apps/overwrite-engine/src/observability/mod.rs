//! Observability module for metrics.
//!
//! Counters are recorded through the `metrics` facade; they are no-ops
//! until [`init_metrics`] installs the Prometheus exporter.

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_eligible_contracts, record_overwrite_run,
    record_risk_gate_decision,
};
