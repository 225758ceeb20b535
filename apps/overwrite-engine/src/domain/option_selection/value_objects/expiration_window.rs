//! Expiration Window Value Object

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::option_selection::SelectionError;

/// Closed range of acceptable expiration dates, `[min_date, max_date]`.
///
/// Invariant: `min_date < max_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationWindow {
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl ExpirationWindow {
    /// Create a window from explicit bounds.
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> Result<Self, SelectionError> {
        if min_date >= max_date {
            return Err(SelectionError::InvertedWindow { min_date, max_date });
        }
        Ok(Self { min_date, max_date })
    }

    /// Earliest acceptable expiration (inclusive).
    #[must_use]
    pub const fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// Latest acceptable expiration (inclusive).
    #[must_use]
    pub const fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// Check whether a date falls inside the window. Both ends are closed.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }
}
