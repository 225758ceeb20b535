//! Shared Value Objects

mod identifiers;
mod symbol;

pub use identifiers::{BrokerOrderId, ClientOrderId};
pub use symbol::{OccParts, Symbol};
