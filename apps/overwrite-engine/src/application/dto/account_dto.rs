//! Account inspection DTO.

use serde::{Deserialize, Serialize};

use crate::application::ports::{AccountConfiguration, AccountSummary};
use crate::domain::portfolio::Position;

/// Read-only view of the account before an overwrite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account summary.
    pub account: AccountSummary,
    /// Risk configuration.
    pub configuration: AccountConfiguration,
    /// Open positions.
    pub positions: Vec<Position>,
    /// Number of active US equities with options listed.
    pub optionable_assets: usize,
}
