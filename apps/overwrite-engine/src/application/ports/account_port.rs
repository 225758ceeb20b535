//! Account Port (Driven Port)
//!
//! Interface for reading the brokerage account and its options risk
//! configuration.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::risk_management::RiskPolicy;

/// Account summary relevant to options trading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account number.
    pub account_number: String,
    /// Account status (e.g. `ACTIVE`).
    pub status: String,
    /// Highest level the broker has approved.
    pub options_approved_level: Option<u8>,
    /// Level currently in effect.
    pub options_trading_level: Option<u8>,
    /// Buying power available for options.
    pub options_buying_power: Decimal,
}

/// Remote view of the account's risk configuration.
///
/// `max_options_trading_level` is `None` when the account never set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountConfiguration {
    /// Maximum options trading level.
    pub max_options_trading_level: Option<u8>,
}

impl From<RiskPolicy> for AccountConfiguration {
    fn from(policy: RiskPolicy) -> Self {
        Self {
            max_options_trading_level: Some(policy.max_options_trading_level()),
        }
    }
}

/// Account port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// Connection error.
    #[error("Account connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Credentials rejected.
    #[error("Account authentication failed")]
    AuthenticationFailed,

    /// The configured level changed between read and write.
    #[error("Account configuration conflict: expected level {expected}, found {actual:?}")]
    Conflict {
        /// Level the caller read.
        expected: u8,
        /// Level found at write time.
        actual: Option<u8>,
    },

    /// Rate limited.
    #[error("Rate limited by broker")]
    RateLimited,

    /// Unknown error.
    #[error("Account error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for account and risk configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountPort: Send + Sync {
    /// Get the account summary.
    async fn get_account(&self) -> Result<AccountSummary, AccountError>;

    /// Get the account's risk configuration.
    async fn get_account_configurations(&self) -> Result<AccountConfiguration, AccountError>;

    /// Overwrite the account's risk configuration.
    async fn set_account_configurations(
        &self,
        policy: RiskPolicy,
    ) -> Result<AccountConfiguration, AccountError>;

    /// Set the maximum options level to `proposed` only if it is still `expected`.
    ///
    /// Returns [`AccountError::Conflict`] when the remote value moved.
    async fn propose_max_options_level(
        &self,
        expected: u8,
        proposed: u8,
    ) -> Result<AccountConfiguration, AccountError>;
}
