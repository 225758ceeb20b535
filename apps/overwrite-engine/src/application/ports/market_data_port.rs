//! Market Data Port (Driven Port)
//!
//! Interface for stock trades, option contract listings and option quotes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_selection::{
    ContractType, ExpirationWindow, OptionContract, StrikeThreshold,
};
use crate::domain::shared::Symbol;

/// Latest trade for a stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestTrade {
    /// Ticker.
    pub symbol: Symbol,
    /// Trade price.
    pub price: Decimal,
    /// Trade time.
    pub timestamp: DateTime<Utc>,
}

/// Latest quote for an option contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// OCC symbol.
    pub symbol: Symbol,
    /// Best bid.
    pub bid_price: Decimal,
    /// Best ask.
    pub ask_price: Decimal,
    /// Quote time.
    pub timestamp: DateTime<Utc>,
}

/// Server-side filter for option contract listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractQuery {
    /// Underlying ticker.
    pub underlying_symbol: Symbol,
    /// Earliest expiration (inclusive).
    pub expiration_date_gte: Option<NaiveDate>,
    /// Latest expiration (inclusive).
    pub expiration_date_lte: Option<NaiveDate>,
    /// Lowest strike (inclusive).
    pub strike_price_gte: Option<Decimal>,
    /// Highest strike (inclusive).
    pub strike_price_lte: Option<Decimal>,
    /// Contract type.
    pub contract_type: Option<ContractType>,
}

impl ContractQuery {
    /// All contracts on `underlying`.
    #[must_use]
    pub fn for_underlying(underlying: impl Into<Symbol>) -> Self {
        Self {
            underlying_symbol: underlying.into(),
            expiration_date_gte: None,
            expiration_date_lte: None,
            strike_price_gte: None,
            strike_price_lte: None,
            contract_type: None,
        }
    }

    /// Contracts that could pass the eligibility filter.
    #[must_use]
    pub fn eligible(
        underlying: impl Into<Symbol>,
        window: &ExpirationWindow,
        threshold: &StrikeThreshold,
        contract_type: ContractType,
    ) -> Self {
        Self {
            expiration_date_gte: Some(window.min_date()),
            expiration_date_lte: Some(window.max_date()),
            strike_price_gte: Some(threshold.min_strike()),
            contract_type: Some(contract_type),
            ..Self::for_underlying(underlying)
        }
    }

    /// Check a contract against the query.
    #[must_use]
    pub fn matches(&self, contract: &OptionContract) -> bool {
        let expiration = contract.expiration_date();
        let strike = contract.strike_price();

        contract.underlying_symbol() == &self.underlying_symbol
            && self.expiration_date_gte.is_none_or(|d| expiration >= d)
            && self.expiration_date_lte.is_none_or(|d| expiration <= d)
            && self.strike_price_gte.is_none_or(|s| strike >= s)
            && self.strike_price_lte.is_none_or(|s| strike <= s)
            && self.contract_type.is_none_or(|t| contract.contract_type() == t)
    }
}

/// Market data port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// No data for the symbol.
    #[error("No market data for {symbol}")]
    NoData {
        /// Requested symbol.
        symbol: String,
    },

    /// Credentials rejected.
    #[error("Market data authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited by market data provider")]
    RateLimited,

    /// Unknown error.
    #[error("Market data error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for market data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Latest trade for a stock.
    async fn get_stock_latest_trade(&self, symbol: &Symbol) -> Result<LatestTrade, MarketDataError>;

    /// All contracts matching `query`, across pages.
    async fn get_option_contracts(
        &self,
        query: ContractQuery,
    ) -> Result<Vec<OptionContract>, MarketDataError>;

    /// Latest quote for an option contract.
    async fn get_option_latest_quote(&self, symbol: &Symbol)
    -> Result<OptionQuote, MarketDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn eligible_query_matches_like_the_filter() {
        let window = ExpirationWindow::new(date(2024, 1, 15), date(2024, 4, 1)).unwrap();
        let threshold = StrikeThreshold::new(dec!(255.00));
        let query = ContractQuery::eligible("AAPL", &window, &threshold, ContractType::Call);

        let inside = OptionContract::call("AAPL240216C00260000", "AAPL", dec!(260), date(2024, 2, 16));
        let too_low = OptionContract::call("AAPL240216C00250000", "AAPL", dec!(250), date(2024, 2, 16));
        let other = OptionContract::call("MSFT240216C00260000", "MSFT", dec!(260), date(2024, 2, 16));

        assert!(query.matches(&inside));
        assert!(!query.matches(&too_low));
        assert!(!query.matches(&other));
    }

    #[test]
    fn unrestricted_query_matches_underlying_only() {
        let query = ContractQuery::for_underlying("aapl");
        let put = OptionContract::new(
            "AAPL240216P00100000",
            "AAPL",
            ContractType::Put,
            dec!(100),
            date(2024, 2, 16),
        );
        assert!(query.matches(&put));
    }
}
