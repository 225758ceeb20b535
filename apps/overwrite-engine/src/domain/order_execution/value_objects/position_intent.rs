//! Position intent for option orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an option order opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionIntent {
    /// Open a long position.
    BuyToOpen,
    /// Close a short position.
    BuyToClose,
    /// Open a short position (writing the option).
    SellToOpen,
    /// Close a long position.
    SellToClose,
}

impl PositionIntent {
    /// Returns true if the order opens a position.
    #[must_use]
    pub const fn is_opening(&self) -> bool {
        matches!(self, Self::BuyToOpen | Self::SellToOpen)
    }

    /// Broker wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BuyToOpen => "buy_to_open",
            Self::BuyToClose => "buy_to_close",
            Self::SellToOpen => "sell_to_open",
            Self::SellToClose => "sell_to_close",
        }
    }
}

impl fmt::Display for PositionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
