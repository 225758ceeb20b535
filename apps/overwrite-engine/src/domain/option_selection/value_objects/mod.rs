//! Option Selection Value Objects

mod candidate_ordering;
mod contract_type;
mod expiration_window;
mod option_contract;
mod strike_threshold;
mod underlying;

pub use candidate_ordering::CandidateOrdering;
pub use contract_type::ContractType;
pub use expiration_window::ExpirationWindow;
pub use option_contract::{OptionContract, STANDARD_MULTIPLIER};
pub use strike_threshold::StrikeThreshold;
pub use underlying::Underlying;
