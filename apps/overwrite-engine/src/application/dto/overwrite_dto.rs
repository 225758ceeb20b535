//! Overwrite run DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_selection::{ExpirationWindow, OptionContract, Underlying};
use crate::domain::order_execution::{OrderConfirmation, OrderRequest, OrderUpdate};
use crate::domain::risk_management::GateState;

/// How an overwrite run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OverwriteOutcome {
    /// Order sent to the broker.
    Submitted {
        /// Order that was sent.
        order: OrderRequest,
        /// Broker acknowledgment.
        confirmation: OrderConfirmation,
        /// Last update seen while following the order.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        update: Option<OrderUpdate>,
    },
    /// Order built but not sent.
    DryRun {
        /// Order that would be sent.
        order: OrderRequest,
    },
    /// No contract passed the filter.
    NoEligibleContracts,
    /// Not enough long shares to cover a single contract.
    InsufficientShares {
        /// Shares one contract needs.
        shares_per_contract: u32,
    },
}

impl OverwriteOutcome {
    /// Metric label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::DryRun { .. } => "dry_run",
            Self::NoEligibleContracts => "no_eligible_contracts",
            Self::InsufficientShares { .. } => "insufficient_shares",
        }
    }

    /// The order built by the run, if any.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderRequest> {
        match self {
            Self::Submitted { order, .. } | Self::DryRun { order } => Some(order),
            Self::NoEligibleContracts | Self::InsufficientShares { .. } => None,
        }
    }
}

/// Where the risk gate ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSummary {
    /// Final gate state.
    pub state: GateState,
    /// Level read from the account.
    pub current_level: Option<u8>,
    /// Level in force after the gate.
    pub effective_level: u8,
    /// Whether a lowered level was written.
    pub level_written: bool,
}

/// Full record of one overwrite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwriteReport {
    /// Date the run was anchored to.
    pub today: NaiveDate,
    /// Underlying snapshot.
    pub underlying: Underlying,
    /// Expiration window.
    pub window: ExpirationWindow,
    /// Minimum strike.
    pub min_strike: Decimal,
    /// Number of eligible contracts.
    pub eligible_count: usize,
    /// Top ranked contract.
    pub selected: Option<OptionContract>,
    /// Contracts the position covers, capped by the configured maximum.
    pub coverable_contracts: Option<u32>,
    /// Risk gate result.
    pub gate: GateSummary,
    /// Outcome.
    #[serde(flatten)]
    pub outcome: OverwriteOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(OverwriteOutcome::InsufficientShares {
            shares_per_contract: 100,
        })
        .unwrap();
        assert_eq!(json["outcome"], "insufficient_shares");
        assert_eq!(json["shares_per_contract"], 100);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(OverwriteOutcome::NoEligibleContracts.label(), "no_eligible_contracts");
        assert!(OverwriteOutcome::NoEligibleContracts.order().is_none());
    }
}
