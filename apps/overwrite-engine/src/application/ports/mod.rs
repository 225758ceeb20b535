//! Application Ports (Driven)
//!
//! Outbound interfaces the use cases depend on. The Alpaca REST adapter and
//! the in-memory brokerage implement all three.

mod account_port;
mod broker_port;
mod market_data_port;

pub use account_port::{AccountConfiguration, AccountError, AccountPort, AccountSummary};
pub use broker_port::{Asset, AssetFilter, BrokerError, BrokerPort, OPTIONS_ENABLED_ATTRIBUTE};
pub use market_data_port::{ContractQuery, LatestTrade, MarketDataError, MarketDataPort, OptionQuote};

#[cfg(test)]
pub use account_port::MockAccountPort;
#[cfg(test)]
pub use broker_port::MockBrokerPort;
#[cfg(test)]
pub use market_data_port::MockMarketDataPort;
