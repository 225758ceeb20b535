//! Position value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Symbol;

/// Direction of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    /// Owned shares or contracts.
    Long,
    /// Borrowed or written.
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// An open position as reported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Absolute quantity held.
    pub quantity: Decimal,
    /// Long or short.
    pub side: PositionSide,
}

impl Position {
    /// Create a long position.
    #[must_use]
    pub fn long(symbol: impl Into<Symbol>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: quantity.abs(),
            side: PositionSide::Long,
        }
    }

    /// Create a short position.
    #[must_use]
    pub fn short(symbol: impl Into<Symbol>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: quantity.abs(),
            side: PositionSide::Short,
        }
    }

    /// Returns true if this is a long position.
    #[must_use]
    pub const fn is_long(&self) -> bool {
        matches!(self.side, PositionSide::Long)
    }

    /// Returns true for a written call on `underlying`.
    #[must_use]
    pub fn is_short_call_on(&self, underlying: &Symbol) -> bool {
        !self.is_long()
            && self
                .symbol
                .occ_parts()
                .is_some_and(|parts| parts.is_call && parts.root == underlying.as_str())
    }
}
