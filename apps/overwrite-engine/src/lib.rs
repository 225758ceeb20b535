// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Overwrite Engine - Covered Call Overwrite Library
//!
//! Selects covered-call contracts for one underlying and gates the account's
//! options trading level before any order is built.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure business rules
//!   - `option_selection`: Expiration window, strike threshold, eligibility filter
//!   - `risk_management`: Risk policy, risk gate and its run state machine
//!   - `order_execution`: Sell-to-open order request and confirmation
//!   - `portfolio`: Positions and covered-call capacity
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `AccountPort`, `BrokerPort`, `MarketDataPort`
//!   - `use_cases`: `RunOverwrite`, `InspectAccount`
//!   - `dto`: Run report and account snapshot
//!
//! - **Infrastructure**: Adapters
//!   - `broker`: Alpaca REST adapter
//!   - `in_memory`: Seeded in-memory brokerage
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML and environment configuration.
pub mod config;

/// Coded errors and exit codes.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::option_selection::{
    ContractType, EligibilityFilter, ExpirationWindow, OptionContract, StrikeThreshold,
};
pub use domain::risk_management::{RiskGate, RiskPolicy, RiskViolation};
pub use domain::shared::Symbol;

pub use application::dto::{OverwriteOutcome, OverwriteReport};
pub use application::use_cases::{
    InspectAccountUseCase, OverwriteParams, RunOverwriteError, RunOverwriteUseCase,
};

pub use error::{EngineError, ErrorCode};
pub use infrastructure::broker::alpaca::{AlpacaAdapter, AlpacaConfig, AlpacaEnvironment};
pub use infrastructure::config::Container;
pub use infrastructure::in_memory::InMemoryBrokerage;
