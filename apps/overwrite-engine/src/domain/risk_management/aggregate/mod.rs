//! Risk Management Aggregates

mod risk_policy;

pub use risk_policy::{MAX_OPTIONS_LEVEL, RiskPolicy};
