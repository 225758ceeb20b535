//! Order Execution Value Objects

mod order_side;
mod order_type;
mod position_intent;
mod time_in_force;

pub use order_side::OrderSide;
pub use order_type::OrderType;
pub use position_intent::PositionIntent;
pub use time_in_force::TimeInForce;
