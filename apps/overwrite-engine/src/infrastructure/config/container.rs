//! Dependency Injection Container
//!
//! Wires port implementations into the use cases.

use std::sync::Arc;

use crate::application::ports::{AccountPort, BrokerPort, MarketDataPort};
use crate::application::use_cases::{InspectAccountUseCase, RunOverwriteUseCase};
use crate::infrastructure::broker::alpaca::{AlpacaAdapter, AlpacaConfig, AlpacaError};
use crate::infrastructure::in_memory::InMemoryBrokerage;

/// Container backed by one Alpaca adapter for every port.
pub type AlpacaContainer = Container<AlpacaAdapter, AlpacaAdapter, AlpacaAdapter>;

/// Container backed by one in-memory brokerage for every port.
pub type InMemoryContainer = Container<InMemoryBrokerage, InMemoryBrokerage, InMemoryBrokerage>;

/// Dependency injection container.
pub struct Container<A, B, M>
where
    A: AccountPort + 'static,
    B: BrokerPort + 'static,
    M: MarketDataPort + 'static,
{
    account: Arc<A>,
    broker: Arc<B>,
    market_data: Arc<M>,
}

impl<A, B, M> Container<A, B, M>
where
    A: AccountPort + 'static,
    B: BrokerPort + 'static,
    M: MarketDataPort + 'static,
{
    /// Create a container from individual ports.
    pub const fn new(account: Arc<A>, broker: Arc<B>, market_data: Arc<M>) -> Self {
        Self {
            account,
            broker,
            market_data,
        }
    }

    /// Get the account port.
    pub fn account(&self) -> Arc<A> {
        Arc::clone(&self.account)
    }

    /// Get the broker port.
    pub fn broker(&self) -> Arc<B> {
        Arc::clone(&self.broker)
    }

    /// Get the market data port.
    pub fn market_data(&self) -> Arc<M> {
        Arc::clone(&self.market_data)
    }

    /// Create an `InspectAccountUseCase`.
    pub fn inspect_account_use_case(&self) -> InspectAccountUseCase<A, B> {
        InspectAccountUseCase::new(Arc::clone(&self.account), Arc::clone(&self.broker))
    }

    /// Create a `RunOverwriteUseCase`.
    pub fn run_overwrite_use_case(&self) -> RunOverwriteUseCase<A, B, M> {
        RunOverwriteUseCase::new(
            Arc::clone(&self.account),
            Arc::clone(&self.broker),
            Arc::clone(&self.market_data),
        )
    }
}

impl<P> Container<P, P, P>
where
    P: AccountPort + BrokerPort + MarketDataPort + 'static,
{
    /// Use one adapter for every port.
    pub fn shared(adapter: Arc<P>) -> Self {
        Self::new(Arc::clone(&adapter), Arc::clone(&adapter), adapter)
    }
}

impl AlpacaContainer {
    /// Build the Alpaca-backed container.
    pub fn alpaca(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        Ok(Self::shared(Arc::new(AlpacaAdapter::new(config)?)))
    }
}

impl InMemoryContainer {
    /// Build a container over a seeded in-memory brokerage.
    pub fn in_memory(brokerage: InMemoryBrokerage) -> Self {
        Self::shared(Arc::new(brokerage))
    }
}
