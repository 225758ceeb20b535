//! Order Execution Bounded Context
//!
//! Builds the single sell-to-open order a covered-call overwrite submits and
//! models the broker's confirmation and the updates that follow it.

pub mod order_confirmation;
pub mod order_request;
pub mod order_update;
pub mod value_objects;

pub use order_confirmation::OrderConfirmation;
pub use order_request::{OrderRequest, OrderStyle};
pub use order_update::{OrderEvent, OrderUpdate};
pub use value_objects::{OrderSide, OrderType, PositionIntent, TimeInForce};
