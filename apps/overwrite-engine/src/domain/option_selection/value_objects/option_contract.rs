//! Option Contract Value Object

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ContractType;
use crate::domain::shared::Symbol;

/// Standard equity option multiplier.
pub const STANDARD_MULTIPLIER: u32 = 100;

/// Option contract reference data. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    /// OCC symbol (e.g., "AAPL240216C00190000").
    symbol: Symbol,
    /// Underlying symbol.
    underlying_symbol: Symbol,
    /// Call or put.
    contract_type: ContractType,
    /// Strike price.
    strike_price: Decimal,
    /// Expiration date.
    expiration_date: NaiveDate,
    /// Shares delivered per contract.
    #[serde(default = "default_multiplier")]
    multiplier: u32,
}

const fn default_multiplier() -> u32 {
    STANDARD_MULTIPLIER
}

impl OptionContract {
    /// Create a new option contract with the standard multiplier.
    #[must_use]
    pub fn new(
        symbol: impl Into<Symbol>,
        underlying_symbol: impl Into<Symbol>,
        contract_type: ContractType,
        strike_price: Decimal,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            underlying_symbol: underlying_symbol.into(),
            contract_type,
            strike_price,
            expiration_date,
            multiplier: STANDARD_MULTIPLIER,
        }
    }

    /// Create a call contract.
    #[must_use]
    pub fn call(
        symbol: impl Into<Symbol>,
        underlying_symbol: impl Into<Symbol>,
        strike_price: Decimal,
        expiration_date: NaiveDate,
    ) -> Self {
        Self::new(
            symbol,
            underlying_symbol,
            ContractType::Call,
            strike_price,
            expiration_date,
        )
    }

    /// Set a non-standard multiplier (adjusted contracts).
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Get the OCC symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the underlying symbol.
    #[must_use]
    pub const fn underlying_symbol(&self) -> &Symbol {
        &self.underlying_symbol
    }

    /// Get the contract type.
    #[must_use]
    pub const fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// Get the strike price.
    #[must_use]
    pub const fn strike_price(&self) -> Decimal {
        self.strike_price
    }

    /// Get the expiration date.
    #[must_use]
    pub const fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    /// Get the contract multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Calendar days from `as_of` until expiration (negative once expired).
    #[must_use]
    pub fn days_to_expiration(&self, as_of: NaiveDate) -> i64 {
        (self.expiration_date - as_of).num_days()
    }
}
