//! Domain Layer
//!
//! Pure decision logic with zero infrastructure dependencies. Nothing in
//! here performs I/O or holds shared mutable state, so every function can be
//! called from any number of evaluation runs at once.
//!
//! # Bounded Contexts
//!
//! - [`option_selection`]: Expiration windows, strike thresholds, contract
//!   eligibility and candidate ranking
//! - [`risk_management`]: Options trading level policy and the risk gate
//! - [`portfolio`]: Positions and covered-call coverage
//! - [`order_execution`]: Covered-call order construction

pub mod option_selection;
pub mod order_execution;
pub mod portfolio;
pub mod risk_management;
pub mod shared;
