//! In-memory adapters for development and tests.

mod brokerage;

pub use brokerage::InMemoryBrokerage;
