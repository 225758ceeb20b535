//! Option Selection Services

mod eligibility_filter;

pub use eligibility_filter::{
    DEFAULT_MAX_DAYS, DEFAULT_MIN_DAYS, DEFAULT_STRIKE_MARGIN, Eligibility, EligibilityFilter,
    compute_min_strike, compute_window, select,
};
