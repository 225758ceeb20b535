//! In-memory brokerage implementing every port.
//!
//! Seeded through builder methods; behaves like a paper account that
//! never moves prices. Not for production use.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::application::ports::{
    AccountConfiguration, AccountError, AccountPort, AccountSummary, Asset, AssetFilter,
    BrokerError, BrokerPort, ContractQuery, LatestTrade, MarketDataError, MarketDataPort,
    OPTIONS_ENABLED_ATTRIBUTE, OptionQuote,
};
use crate::domain::option_selection::OptionContract;
use crate::domain::order_execution::{OrderConfirmation, OrderEvent, OrderRequest, OrderUpdate};
use crate::domain::portfolio::Position;
use crate::domain::risk_management::{COVERED_CALL_LEVEL, RiskPolicy};
use crate::domain::shared::{BrokerOrderId, Symbol};

#[derive(Debug, Default)]
struct State {
    account: Option<AccountSummary>,
    max_options_level: Option<u8>,
    assets: Vec<Asset>,
    positions: Vec<Position>,
    contracts: Vec<OptionContract>,
    trades: HashMap<Symbol, LatestTrade>,
    quotes: HashMap<Symbol, OptionQuote>,
    orders: Vec<OrderRequest>,
    order_event: Option<OrderEvent>,
}

/// In-memory implementation of `AccountPort`, `BrokerPort` and `MarketDataPort`.
#[derive(Debug, Default)]
pub struct InMemoryBrokerage {
    state: RwLock<State>,
    clock: Option<DateTime<Utc>>,
}

impl InMemoryBrokerage {
    /// Create an empty brokerage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the timestamp stamped on trades and quotes.
    #[must_use]
    pub const fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    /// Set the account summary.
    #[must_use]
    pub fn with_account(self, account: AccountSummary) -> Self {
        self.write().account = Some(account);
        self
    }

    /// Set the account's maximum options trading level.
    #[must_use]
    pub fn with_max_options_level(self, level: Option<u8>) -> Self {
        self.write().max_options_level = level;
        self
    }

    /// Add a tradable asset.
    #[must_use]
    pub fn with_asset(self, symbol: &str, options_enabled: bool) -> Self {
        let attributes = if options_enabled {
            vec![OPTIONS_ENABLED_ATTRIBUTE.to_string()]
        } else {
            Vec::new()
        };
        self.write().assets.push(Asset {
            symbol: Symbol::new(symbol),
            name: symbol.to_string(),
            status: "active".to_string(),
            tradable: true,
            attributes,
        });
        self
    }

    /// Add a position.
    #[must_use]
    pub fn with_position(self, position: Position) -> Self {
        self.write().positions.push(position);
        self
    }

    /// List an option contract.
    #[must_use]
    pub fn with_contract(self, contract: OptionContract) -> Self {
        self.write().contracts.push(contract);
        self
    }

    /// Set the latest trade price for a stock.
    #[must_use]
    pub fn with_trade(self, symbol: &str, price: Decimal) -> Self {
        let symbol = Symbol::new(symbol);
        let trade = LatestTrade {
            symbol: symbol.clone(),
            price,
            timestamp: self.now(),
        };
        self.write().trades.insert(symbol, trade);
        self
    }

    /// Set the latest quote for an option contract.
    #[must_use]
    pub fn with_quote(self, symbol: &str, bid_price: Decimal, ask_price: Decimal) -> Self {
        let symbol = Symbol::new(symbol);
        let quote = OptionQuote {
            symbol: symbol.clone(),
            bid_price,
            ask_price,
            timestamp: self.now(),
        };
        self.write().quotes.insert(symbol, quote);
        self
    }

    /// Event reported for every followed order (`new` when unset).
    #[must_use]
    pub fn with_order_event(self, event: OrderEvent) -> Self {
        self.write().order_event = Some(event);
        self
    }

    /// Current maximum options trading level.
    #[must_use]
    pub fn max_options_level(&self) -> Option<u8> {
        self.read().max_options_level
    }

    /// Orders accepted so far, oldest first.
    #[must_use]
    pub fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.read().orders.clone()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountPort for InMemoryBrokerage {
    async fn get_account(&self) -> Result<AccountSummary, AccountError> {
        self.read()
            .account
            .clone()
            .ok_or(AccountError::AuthenticationFailed)
    }

    async fn get_account_configurations(&self) -> Result<AccountConfiguration, AccountError> {
        Ok(AccountConfiguration {
            max_options_trading_level: self.read().max_options_level,
        })
    }

    async fn set_account_configurations(
        &self,
        policy: RiskPolicy,
    ) -> Result<AccountConfiguration, AccountError> {
        self.write().max_options_level = Some(policy.max_options_trading_level());
        Ok(policy.into())
    }

    async fn propose_max_options_level(
        &self,
        expected: u8,
        proposed: u8,
    ) -> Result<AccountConfiguration, AccountError> {
        let mut state = self.write();
        if state.max_options_level != Some(expected) {
            return Err(AccountError::Conflict {
                expected,
                actual: state.max_options_level,
            });
        }
        state.max_options_level = Some(proposed);
        Ok(AccountConfiguration {
            max_options_trading_level: Some(proposed),
        })
    }
}

#[async_trait]
impl BrokerPort for InMemoryBrokerage {
    async fn get_all_assets(&self, filter: AssetFilter) -> Result<Vec<Asset>, BrokerError> {
        Ok(self
            .read()
            .assets
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    async fn get_asset(&self, symbol: &Symbol) -> Result<Asset, BrokerError> {
        self.read()
            .assets
            .iter()
            .find(|a| &a.symbol == symbol)
            .cloned()
            .ok_or_else(|| BrokerError::AssetNotFound {
                symbol: symbol.to_string(),
            })
    }

    async fn get_all_positions(&self) -> Result<Vec<Position>, BrokerError> {
        Ok(self.read().positions.clone())
    }

    async fn submit_order(&self, order: OrderRequest) -> Result<OrderConfirmation, BrokerError> {
        let mut state = self.write();

        if state
            .max_options_level
            .is_none_or(|level| level < COVERED_CALL_LEVEL)
        {
            return Err(BrokerError::OrderRejected {
                reason: "options trading level does not permit covered calls".to_string(),
            });
        }
        if !state.contracts.iter().any(|c| c.symbol() == order.symbol()) {
            return Err(BrokerError::OrderRejected {
                reason: format!("unknown contract {}", order.symbol()),
            });
        }

        state.orders.push(order.clone());
        let broker_order_id = BrokerOrderId::new(format!("mem-{}", state.orders.len()));
        tracing::debug!(%broker_order_id, symbol = %order.symbol(), "In-memory order accepted");

        Ok(OrderConfirmation {
            broker_order_id,
            client_order_id: order.client_order_id().clone(),
            symbol: order.symbol().clone(),
            status: "accepted".to_string(),
        })
    }

    async fn await_order_update(
        &self,
        confirmation: &OrderConfirmation,
        _timeout: Duration,
    ) -> Result<Option<OrderUpdate>, BrokerError> {
        let state = self.read();
        let Some(order) = state
            .orders
            .iter()
            .find(|o| o.client_order_id() == &confirmation.client_order_id)
        else {
            return Ok(None);
        };

        let event = state.order_event.unwrap_or(OrderEvent::New);
        let (filled_qty, filled_avg_price) = if event == OrderEvent::Fill {
            let price = order
                .limit_price()
                .or_else(|| state.quotes.get(order.symbol()).map(|q| q.bid_price));
            (Decimal::from(order.qty()), price)
        } else {
            (Decimal::ZERO, None)
        };

        Ok(Some(OrderUpdate {
            broker_order_id: confirmation.broker_order_id.clone(),
            client_order_id: confirmation.client_order_id.clone(),
            symbol: confirmation.symbol.clone(),
            event,
            filled_qty,
            filled_avg_price,
            timestamp: Some(self.now()),
        }))
    }
}

#[async_trait]
impl MarketDataPort for InMemoryBrokerage {
    async fn get_stock_latest_trade(&self, symbol: &Symbol) -> Result<LatestTrade, MarketDataError> {
        self.read()
            .trades
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::NoData {
                symbol: symbol.to_string(),
            })
    }

    async fn get_option_contracts(
        &self,
        query: ContractQuery,
    ) -> Result<Vec<OptionContract>, MarketDataError> {
        Ok(self
            .read()
            .contracts
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    async fn get_option_latest_quote(
        &self,
        symbol: &Symbol,
    ) -> Result<OptionQuote, MarketDataError> {
        self.read()
            .quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::NoData {
                symbol: symbol.to_string(),
            })
    }
}
