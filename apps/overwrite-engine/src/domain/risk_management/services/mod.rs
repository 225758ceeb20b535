//! Risk Management Services

mod risk_gate;
mod risk_gate_run;

pub use risk_gate::{Authorization, COVERED_CALL_LEVEL, RiskGate};
pub use risk_gate_run::{GateState, RiskGateRun};
