//! Risk Gate Run State Machine
//!
//! `INIT -> CONFIG_READ -> {AUTHORIZED, REJECTED}`, then
//! `AUTHORIZED -> CONFIG_WRITTEN` when the level is lowered.
//! `REJECTED` and `CONFIG_WRITTEN` are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::risk_management::errors::{RiskGateError, RiskViolation};
use crate::domain::risk_management::services::risk_gate::{Authorization, RiskGate};
use crate::domain::shared::DomainError;

/// State of one gate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// Nothing read yet.
    Init,
    /// Account configuration read.
    ConfigRead,
    /// Desired level authorized.
    Authorized,
    /// Desired level refused.
    Rejected,
    /// Lowered level written to the account.
    ConfigWritten,
}

impl GateState {
    /// Check if a transition is allowed.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Init, Self::ConfigRead)
                | (Self::ConfigRead, Self::Authorized)
                | (Self::ConfigRead, Self::Rejected)
                | (Self::Authorized, Self::ConfigWritten)
        )
    }

    /// Check if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::ConfigWritten)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::ConfigRead => "CONFIG_READ",
            Self::Authorized => "AUTHORIZED",
            Self::Rejected => "REJECTED",
            Self::ConfigWritten => "CONFIG_WRITTEN",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the gate through one evaluation run.
#[derive(Debug, Clone)]
pub struct RiskGateRun {
    state: GateState,
    current_level: Option<u8>,
    authorization: Option<Authorization>,
    violation: Option<RiskViolation>,
}

impl Default for RiskGateRun {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskGateRun {
    /// Start a run in `INIT`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GateState::Init,
            current_level: None,
            authorization: None,
            violation: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Level read from the account, if any.
    #[must_use]
    pub const fn current_level(&self) -> Option<u8> {
        self.current_level
    }

    /// Authorization, once granted.
    #[must_use]
    pub const fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    /// Violation, once rejected.
    #[must_use]
    pub const fn violation(&self) -> Option<&RiskViolation> {
        self.violation.as_ref()
    }

    fn transition(&mut self, to: GateState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(to) {
            return Err(DomainError::InvalidStateTransition {
                entity: "RiskGateRun".to_string(),
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }

    /// Record the account's configured level (`None` when unset).
    pub fn record_config_read(&mut self, current_level: Option<u8>) -> Result<(), DomainError> {
        self.transition(GateState::ConfigRead)?;
        self.current_level = current_level;
        Ok(())
    }

    /// Run the gate against the recorded level.
    pub fn decide(
        &mut self,
        desired_level: u8,
        policy_ceiling: u8,
    ) -> Result<Authorization, RiskGateError> {
        if self.state != GateState::ConfigRead {
            // Reports the transition the caller attempted
            self.transition(GateState::Authorized)?;
        }

        match RiskGate::authorize(self.current_level, desired_level, policy_ceiling) {
            Ok(authorization) => {
                self.transition(GateState::Authorized)?;
                self.authorization = Some(authorization);
                Ok(authorization)
            }
            Err(violation) => {
                self.transition(GateState::Rejected)?;
                self.violation = Some(violation.clone());
                Err(violation.into())
            }
        }
    }

    /// Record that the lowered level was written to the account.
    pub fn record_config_written(&mut self) -> Result<(), DomainError> {
        self.transition(GateState::ConfigWritten)
    }
}
