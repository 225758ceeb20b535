//! Risk Gate
//!
//! Decides whether a desired options trading level may be applied to an
//! account. Pure: it never touches the remote configuration.

use serde::{Deserialize, Serialize};

use crate::domain::risk_management::errors::RiskViolation;

/// Minimum options trading level that allows writing covered calls.
pub const COVERED_CALL_LEVEL: u8 = 1;

/// Confirmation that `desired_level` may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Level currently configured on the account.
    pub current_level: u8,
    /// Level the run asked for.
    pub desired_level: u8,
    /// Policy ceiling the request was checked against.
    pub policy_ceiling: u8,
}

impl Authorization {
    /// Whether applying the authorization lowers the account's level.
    ///
    /// A desired level above the current one is authorized but never written.
    #[must_use]
    pub const fn lowers_level(&self) -> bool {
        self.desired_level < self.current_level
    }

    /// Level in force once the authorization has been applied.
    #[must_use]
    pub fn effective_level(&self) -> u8 {
        self.current_level.min(self.desired_level)
    }

    /// Check the effective level allows covered calls.
    pub fn ensure_covered_calls(&self) -> Result<(), RiskViolation> {
        let effective = self.effective_level();
        if effective < COVERED_CALL_LEVEL {
            return Err(RiskViolation::level_insufficient(
                effective,
                COVERED_CALL_LEVEL,
            ));
        }
        Ok(())
    }
}

/// Stateless risk gate.
pub struct RiskGate;

impl RiskGate {
    /// Authorize `desired_level` against `policy_ceiling`.
    ///
    /// The ceiling is checked before the account configuration, so a request
    /// above the ceiling on a misconfigured account reports `ceiling_exceeded`.
    pub fn authorize(
        current_max_level: Option<u8>,
        desired_level: u8,
        policy_ceiling: u8,
    ) -> Result<Authorization, RiskViolation> {
        if desired_level > policy_ceiling {
            return Err(RiskViolation::ceiling_exceeded(desired_level, policy_ceiling));
        }

        let current_level = current_max_level.ok_or_else(RiskViolation::account_misconfigured)?;

        Ok(Authorization {
            current_level,
            desired_level,
            policy_ceiling,
        })
    }
}
