//! Candidate ordering for eligible contracts.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::OptionContract;

/// Explicit sort key applied to eligible contracts before one is picked.
///
/// Ties are broken by OCC symbol so a ranking never depends on the order the
/// data source returned contracts in (except for [`CandidateOrdering::SourceOrder`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrdering {
    /// Nearest expiration first, then lowest strike.
    #[default]
    NearestExpiryLowestStrike,
    /// Lowest strike first, then nearest expiration.
    LowestStrikeNearestExpiry,
    /// Keep whatever order the data source returned.
    SourceOrder,
}

impl CandidateOrdering {
    /// Compare two contracts under this ordering.
    #[must_use]
    pub fn compare(&self, a: &OptionContract, b: &OptionContract) -> Ordering {
        match self {
            Self::NearestExpiryLowestStrike => a
                .expiration_date()
                .cmp(&b.expiration_date())
                .then_with(|| a.strike_price().cmp(&b.strike_price()))
                .then_with(|| a.symbol().cmp(b.symbol())),
            Self::LowestStrikeNearestExpiry => a
                .strike_price()
                .cmp(&b.strike_price())
                .then_with(|| a.expiration_date().cmp(&b.expiration_date()))
                .then_with(|| a.symbol().cmp(b.symbol())),
            Self::SourceOrder => Ordering::Equal,
        }
    }

    /// Sort contracts in place. The sort is stable.
    pub fn rank(&self, contracts: &mut [OptionContract]) {
        if matches!(self, Self::SourceOrder) {
            return;
        }
        contracts.sort_by(|a, b| self.compare(a, b));
    }
}
