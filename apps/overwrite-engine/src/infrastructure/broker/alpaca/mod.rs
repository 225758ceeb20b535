//! Alpaca Markets Adapter
//!
//! One adapter implementing all three ports against Alpaca's REST APIs:
//! - Trading API: account, account configurations, assets, positions, orders,
//!   option contracts
//! - Data API: latest stock trades and latest option quotes
//! - Trade updates stream: bounded follow-up of a submitted order
//! - Retry with exponential backoff and jitter on 408/429/5xx

mod account;
mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;
mod market_data;
mod trade_updates;
mod trading;

pub use adapter::AlpacaAdapter;
pub use config::{AlpacaConfig, AlpacaEnvironment, RetryConfig};
pub use error::AlpacaError;
