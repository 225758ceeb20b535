//! Strike Threshold Value Object

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum acceptable strike for a covered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeThreshold {
    min_strike: Decimal,
}

impl StrikeThreshold {
    /// Wrap an already computed minimum strike.
    #[must_use]
    pub const fn new(min_strike: Decimal) -> Self {
        Self { min_strike }
    }

    /// The minimum strike.
    #[must_use]
    pub const fn min_strike(&self) -> Decimal {
        self.min_strike
    }

    /// A strike equal to the threshold is admitted.
    #[must_use]
    pub fn admits(&self, strike: Decimal) -> bool {
        strike >= self.min_strike
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn admits_is_closed_at_threshold() {
        let threshold = StrikeThreshold::new(dec!(255.00));
        assert!(threshold.admits(dec!(255)));
        assert!(threshold.admits(dec!(255.01)));
        assert!(!threshold.admits(dec!(254.99)));
    }
}
