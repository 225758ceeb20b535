//! Broker Port (Driven Port)
//!
//! Interface for asset lookups, positions, order submission and the order
//! updates that follow a submission.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::{OrderConfirmation, OrderRequest, OrderUpdate};
use crate::domain::portfolio::Position;
use crate::domain::shared::Symbol;

/// Asset attribute the broker sets on optionable equities.
pub const OPTIONS_ENABLED_ATTRIBUTE: &str = "options_enabled";

/// A tradable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker.
    pub symbol: Symbol,
    /// Display name.
    pub name: String,
    /// Asset status (`active` or `inactive`).
    pub status: String,
    /// Whether the broker accepts orders.
    pub tradable: bool,
    /// Broker attributes.
    pub attributes: Vec<String>,
}

impl Asset {
    /// Whether options are listed on this asset.
    #[must_use]
    pub fn options_enabled(&self) -> bool {
        self.attributes.iter().any(|a| a == OPTIONS_ENABLED_ATTRIBUTE)
    }
}

/// Server-side filter for asset listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetFilter {
    /// Asset status.
    pub status: Option<String>,
    /// Asset class (e.g. `us_equity`).
    pub asset_class: Option<String>,
    /// Required attributes (all must be present).
    pub attributes: Vec<String>,
}

impl AssetFilter {
    /// Active US equities with options listed.
    #[must_use]
    pub fn optionable_equities() -> Self {
        Self {
            status: Some("active".to_string()),
            asset_class: Some("us_equity".to_string()),
            attributes: vec![OPTIONS_ENABLED_ATTRIBUTE.to_string()],
        }
    }

    /// Check an asset against the filter.
    #[must_use]
    pub fn matches(&self, asset: &Asset) -> bool {
        self.status.as_ref().is_none_or(|s| s.eq_ignore_ascii_case(&asset.status))
            && self
                .attributes
                .iter()
                .all(|wanted| asset.attributes.iter().any(|a| a == wanted))
    }
}

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Connection error.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Order rejected by broker.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Asset not found.
    #[error("Asset not found: {symbol}")]
    AssetNotFound {
        /// The missing symbol.
        symbol: String,
    },

    /// Credentials rejected.
    #[error("Broker authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited by broker")]
    RateLimited,

    /// Unknown error.
    #[error("Broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for trading interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// List assets matching `filter`.
    async fn get_all_assets(&self, filter: AssetFilter) -> Result<Vec<Asset>, BrokerError>;

    /// Look up one asset.
    async fn get_asset(&self, symbol: &Symbol) -> Result<Asset, BrokerError>;

    /// List all open positions.
    async fn get_all_positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Submit an order.
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderConfirmation, BrokerError>;

    /// Follow a submitted order until a terminal update or `timeout`.
    ///
    /// Returns the last update observed; `None` if nothing arrived in time.
    async fn await_order_update(
        &self,
        confirmation: &OrderConfirmation,
        timeout: Duration,
    ) -> Result<Option<OrderUpdate>, BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(status: &str, attributes: &[&str]) -> Asset {
        Asset {
            symbol: Symbol::new("AAPL"),
            name: "Apple Inc. Common Stock".to_string(),
            status: status.to_string(),
            tradable: true,
            attributes: attributes.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn options_enabled_attribute() {
        assert!(asset("active", &["fractional_eh_enabled", "options_enabled"]).options_enabled());
        assert!(!asset("active", &["has_options"]).options_enabled());
    }

    #[test]
    fn optionable_filter_matches() {
        let filter = AssetFilter::optionable_equities();
        assert!(filter.matches(&asset("active", &["options_enabled"])));
        assert!(!filter.matches(&asset("inactive", &["options_enabled"])));
        assert!(!filter.matches(&asset("active", &[])));
        assert!(AssetFilter::default().matches(&asset("inactive", &[])));
    }
}
