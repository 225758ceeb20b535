//! Data Transfer Objects
//!
//! Serializable reports handed back to the binary.

mod account_dto;
mod overwrite_dto;

pub use account_dto::AccountSnapshot;
pub use overwrite_dto::{GateSummary, OverwriteOutcome, OverwriteReport};
