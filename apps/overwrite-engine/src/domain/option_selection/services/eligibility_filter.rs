//! Eligibility Filter
//!
//! Pure functions that turn `today` and the underlying's last price into an
//! expiration window and a minimum strike, then keep only the contracts a
//! covered call may be written on.
//!
//! None of these functions perform I/O or touch shared state.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::option_selection::SelectionError;
use crate::domain::option_selection::value_objects::{
    CandidateOrdering, ContractType, ExpirationWindow, OptionContract, StrikeThreshold,
};

/// Default lower bound of the expiration window, in days from today.
pub const DEFAULT_MIN_DAYS: u32 = 14;

/// Default upper bound of the expiration window, in days from today.
pub const DEFAULT_MAX_DAYS: u32 = 90;

/// Default out-of-the-money margin applied to the last price (2%).
pub const DEFAULT_STRIKE_MARGIN: Decimal = dec!(0.02);

/// Strike prices are quoted to the cent.
const STRIKE_DECIMALS: u32 = 2;

/// Compute the expiration window `[today + min_days, today + max_days]`.
pub fn compute_window(
    today: NaiveDate,
    min_days: u32,
    max_days: u32,
) -> Result<ExpirationWindow, SelectionError> {
    if min_days >= max_days {
        return Err(SelectionError::InvalidWindow { min_days, max_days });
    }

    let offset = |days: u32| {
        today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(SelectionError::WindowOutOfRange { today })
    };

    ExpirationWindow::new(offset(min_days)?, offset(max_days)?)
}

/// Compute `round_half_up(last_price * (1 + margin), 2)`.
///
/// A sub-cent price whose product rounds to zero is rejected as
/// [`SelectionError::InvalidPrice`]; the threshold is always positive.
pub fn compute_min_strike(last_price: Decimal, margin: Decimal) -> Result<Decimal, SelectionError> {
    if last_price <= Decimal::ZERO {
        return Err(SelectionError::InvalidPrice { last_price });
    }
    if margin < Decimal::ZERO {
        return Err(SelectionError::InvalidMargin { margin });
    }

    let scaled = last_price
        .checked_mul(Decimal::ONE + margin)
        .ok_or(SelectionError::InvalidPrice { last_price })?;

    let min_strike =
        scaled.round_dp_with_strategy(STRIKE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    if min_strike <= Decimal::ZERO {
        return Err(SelectionError::InvalidPrice { last_price });
    }
    Ok(min_strike)
}

/// Keep the contracts of `contract_type` expiring inside `window` with a
/// strike at or above `min_strike`.
///
/// Output preserves input order; rank explicitly with [`CandidateOrdering`].
#[must_use]
pub fn select(
    contracts: &[OptionContract],
    window: &ExpirationWindow,
    min_strike: Decimal,
    contract_type: ContractType,
) -> Vec<OptionContract> {
    let threshold = StrikeThreshold::new(min_strike);
    contracts
        .iter()
        .filter(|c| {
            c.contract_type() == contract_type
                && window.contains(c.expiration_date())
                && threshold.admits(c.strike_price())
        })
        .cloned()
        .collect()
}

/// Result of one eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// Window the contracts were checked against.
    pub window: ExpirationWindow,
    /// Strike threshold the contracts were checked against.
    pub threshold: StrikeThreshold,
    /// Eligible contracts, ranked.
    pub candidates: Vec<OptionContract>,
}

impl Eligibility {
    /// Highest ranked candidate, if any.
    #[must_use]
    pub fn best(&self) -> Option<&OptionContract> {
        self.candidates.first()
    }
}

/// Eligibility criteria bundled for one strategy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityFilter {
    /// Lower bound of the window in days.
    pub min_days: u32,
    /// Upper bound of the window in days.
    pub max_days: u32,
    /// Out-of-the-money margin (0.02 = 2%).
    pub strike_margin: Decimal,
    /// Contract type to keep.
    pub contract_type: ContractType,
    /// Ranking applied after filtering.
    pub ordering: CandidateOrdering,
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self {
            min_days: DEFAULT_MIN_DAYS,
            max_days: DEFAULT_MAX_DAYS,
            strike_margin: DEFAULT_STRIKE_MARGIN,
            contract_type: ContractType::Call,
            ordering: CandidateOrdering::default(),
        }
    }
}

impl EligibilityFilter {
    /// Window for this configuration.
    pub fn window(&self, today: NaiveDate) -> Result<ExpirationWindow, SelectionError> {
        compute_window(today, self.min_days, self.max_days)
    }

    /// Strike threshold for this configuration.
    pub fn threshold(&self, last_price: Decimal) -> Result<StrikeThreshold, SelectionError> {
        compute_min_strike(last_price, self.strike_margin).map(StrikeThreshold::new)
    }

    /// Validate inputs, filter and rank in one step.
    ///
    /// `today` must be captured once by the caller and reused for the whole run.
    pub fn evaluate(
        &self,
        today: NaiveDate,
        last_price: Decimal,
        contracts: &[OptionContract],
    ) -> Result<Eligibility, SelectionError> {
        let window = self.window(today)?;
        let threshold = self.threshold(last_price)?;
        Ok(self.apply(window, threshold, contracts))
    }

    /// Filter and rank against an already computed window and threshold.
    #[must_use]
    pub fn apply(
        &self,
        window: ExpirationWindow,
        threshold: StrikeThreshold,
        contracts: &[OptionContract],
    ) -> Eligibility {
        let mut candidates = select(
            contracts,
            &window,
            threshold.min_strike(),
            self.contract_type,
        );
        self.ordering.rank(&mut candidates);

        Eligibility {
            window,
            threshold,
            candidates,
        }
    }
}
