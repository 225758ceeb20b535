//! Option Selection Bounded Context
//!
//! Decides which option contracts are eligible candidates for a covered-call
//! overwrite:
//! - Expiration window anchored to a single `today`
//! - Minimum strike a fixed margin out of the money
//! - Stable eligibility filter and explicit candidate ranking

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::SelectionError;
pub use services::{
    DEFAULT_MAX_DAYS, DEFAULT_MIN_DAYS, DEFAULT_STRIKE_MARGIN, Eligibility, EligibilityFilter,
    compute_min_strike, compute_window, select,
};
pub use value_objects::{
    CandidateOrdering, ContractType, ExpirationWindow, OptionContract, STANDARD_MULTIPLIER,
    StrikeThreshold, Underlying,
};
