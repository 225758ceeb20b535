//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces to the brokerage (account, trading, market data)
//! - **Use Cases**: The overwrite run and the read-only account inspection
//! - **DTOs**: Reports returned to the binary

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
