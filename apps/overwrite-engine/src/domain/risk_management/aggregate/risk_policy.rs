//! Risk Policy Aggregate

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Highest options trading level a brokerage account can carry.
///
/// 0 = disabled, 1 = covered calls / cash-secured puts, 2 = long options,
/// 3 = spreads.
pub const MAX_OPTIONS_LEVEL: u8 = 3;

/// Account-level options risk policy.
///
/// The engine only ever reads this value or lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPolicy {
    max_options_trading_level: u8,
}

impl RiskPolicy {
    /// Create a policy, rejecting levels above [`MAX_OPTIONS_LEVEL`].
    pub fn new(max_options_trading_level: u8) -> Result<Self, DomainError> {
        if max_options_trading_level > MAX_OPTIONS_LEVEL {
            return Err(DomainError::InvalidValue {
                field: "max_options_trading_level".to_string(),
                message: format!(
                    "level {max_options_trading_level} exceeds maximum {MAX_OPTIONS_LEVEL}"
                ),
            });
        }
        Ok(Self {
            max_options_trading_level,
        })
    }

    /// Get the maximum options trading level.
    #[must_use]
    pub const fn max_options_trading_level(&self) -> u8 {
        self.max_options_trading_level
    }
}
