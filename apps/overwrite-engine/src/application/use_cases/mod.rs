//! Application Use Cases

mod inspect_account;
mod run_overwrite;

pub use inspect_account::{InspectAccountError, InspectAccountUseCase};
pub use run_overwrite::{OverwriteParams, RunOverwriteError, RunOverwriteUseCase};
