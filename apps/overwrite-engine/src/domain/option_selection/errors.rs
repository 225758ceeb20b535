//! Option Selection Errors

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised while computing eligibility inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The window bounds are not strictly increasing.
    #[error("Invalid expiration window: min_days ({min_days}) must be less than max_days ({max_days})")]
    InvalidWindow {
        /// Requested lower bound in days.
        min_days: u32,
        /// Requested upper bound in days.
        max_days: u32,
    },

    /// Explicit window bounds are not strictly increasing.
    #[error("Invalid expiration window: {min_date} must be before {max_date}")]
    InvertedWindow {
        /// Lower bound.
        min_date: NaiveDate,
        /// Upper bound.
        max_date: NaiveDate,
    },

    /// The window cannot be represented from the given date.
    #[error("Expiration window out of calendar range from {today}")]
    WindowOutOfRange {
        /// Anchor date.
        today: NaiveDate,
    },

    /// The underlying price is not positive, rounds to a zero strike, or overflows.
    #[error("Invalid underlying price: {last_price}")]
    InvalidPrice {
        /// Offending price.
        last_price: Decimal,
    },

    /// The strike margin is negative.
    #[error("Invalid strike margin: {margin} (must be >= 0)")]
    InvalidMargin {
        /// Offending margin.
        margin: Decimal,
    },
}
