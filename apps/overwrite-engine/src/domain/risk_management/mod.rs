//! Risk Management Bounded Context
//!
//! Gates an overwrite run on the account's maximum options trading level.
//!
//! # Key Concepts
//!
//! - **Risk Policy**: The account-level options trading ceiling
//! - **Risk Gate**: Pure authorization of a desired level against a policy ceiling
//! - **Gate Run**: Per-run state machine around reading, deciding and writing the level

pub mod aggregate;
pub mod errors;
pub mod services;

pub use aggregate::{MAX_OPTIONS_LEVEL, RiskPolicy};
pub use errors::{RiskGateError, RiskViolation, ViolationReason};
pub use services::{Authorization, COVERED_CALL_LEVEL, GateState, RiskGate, RiskGateRun};
