//! Underlying snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

/// Immutable snapshot of the underlying, fetched once per evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Underlying {
    /// Ticker.
    pub symbol: Symbol,
    /// Last traded price.
    pub last_price: Decimal,
    /// Whether the broker lists options on this asset.
    pub options_enabled: bool,
}

impl Underlying {
    /// Create a snapshot.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, last_price: Decimal, options_enabled: bool) -> Self {
        Self {
            symbol: symbol.into(),
            last_price,
            options_enabled,
        }
    }
}
