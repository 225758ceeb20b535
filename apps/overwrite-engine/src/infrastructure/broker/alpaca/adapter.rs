//! Alpaca adapter implementing the account, broker and market data ports.

use tokio::sync::Mutex;

use super::config::{AlpacaConfig, AlpacaEnvironment};
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;
use super::trade_updates::TradeUpdatesClient;

/// Alpaca Markets adapter.
///
/// The port implementations live in `account.rs`, `trading.rs` and
/// `market_data.rs`; order follow-up in `trade_updates.rs`.
#[derive(Debug)]
pub struct AlpacaAdapter {
    pub(super) client: AlpacaHttpClient,
    pub(super) trade_updates: TradeUpdatesClient,
    pub(super) environment: AlpacaEnvironment,
    /// Serializes the read-compare-write of the options level.
    pub(super) config_lock: Mutex<()>,
}

impl AlpacaAdapter {
    /// Create a new Alpaca adapter.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        let client = AlpacaHttpClient::new(config)?;
        tracing::info!(
            environment = %config.environment,
            trading_url = config.trading_base_url(),
            stream_url = config.trade_stream_url(),
            "Alpaca adapter initialized"
        );
        Ok(Self {
            client,
            trade_updates: TradeUpdatesClient::new(config),
            environment: config.environment,
            config_lock: Mutex::new(()),
        })
    }

    /// Trading environment.
    #[must_use]
    pub const fn environment(&self) -> AlpacaEnvironment {
        self.environment
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }
}
