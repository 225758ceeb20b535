//! Risk management errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Why the risk gate refused a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    /// The desired level is above the policy ceiling.
    CeilingExceeded,
    /// The account has no maximum options trading level configured.
    AccountMisconfigured,
    /// The effective level does not allow covered calls.
    LevelInsufficient,
}

impl ViolationReason {
    /// Stable machine-readable reason.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CeilingExceeded => "ceiling_exceeded",
            Self::AccountMisconfigured => "account_misconfigured",
            Self::LevelInsufficient => "level_insufficient",
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run refused by the risk gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskViolation {
    /// Violation reason.
    pub reason: ViolationReason,
    /// Human-readable detail.
    pub message: String,
}

impl RiskViolation {
    /// Desired level above the policy ceiling.
    #[must_use]
    pub fn ceiling_exceeded(desired: u8, ceiling: u8) -> Self {
        Self {
            reason: ViolationReason::CeilingExceeded,
            message: format!("desired level {desired} exceeds policy ceiling {ceiling}"),
        }
    }

    /// Account has no configured level.
    #[must_use]
    pub fn account_misconfigured() -> Self {
        Self {
            reason: ViolationReason::AccountMisconfigured,
            message: "account has no max_options_trading_level configured".to_string(),
        }
    }

    /// Effective level below what covered calls need.
    #[must_use]
    pub fn level_insufficient(effective: u8, required: u8) -> Self {
        Self {
            reason: ViolationReason::LevelInsufficient,
            message: format!("effective level {effective} is below required level {required}"),
        }
    }
}

impl fmt::Display for RiskViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Risk violation [{}]: {}", self.reason, self.message)
    }
}

impl std::error::Error for RiskViolation {}

/// Failure of a gate run: either a refusal or a misuse of the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskGateError {
    /// The gate refused the run.
    #[error(transparent)]
    Violation(#[from] RiskViolation),

    /// A step was attempted out of order.
    #[error(transparent)]
    Transition(#[from] DomainError),
}
