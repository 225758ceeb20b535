//! Portfolio Bounded Context
//!
//! Read-only view of the account's holdings and how many covered calls
//! they support.

pub mod coverage;
pub mod position;

pub use coverage::coverable_contracts;
pub use position::{Position, PositionSide};
