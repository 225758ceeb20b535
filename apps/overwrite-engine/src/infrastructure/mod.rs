//! Infrastructure Layer
//!
//! Adapters implementing the application ports:
//!
//! - `broker/alpaca/`: Alpaca REST adapter (account, trading, market data)
//! - `in_memory/`: Deterministic brokerage for tests and offline dry runs
//! - `config/`: Dependency injection container

pub mod broker;
pub mod config;
pub mod in_memory;
