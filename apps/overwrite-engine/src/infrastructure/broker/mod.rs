//! Broker adapters.

pub mod alpaca;
