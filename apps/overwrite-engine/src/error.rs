//! Structured errors for the overwrite engine binary.
//!
//! Every failure is reduced to an [`ErrorCode`] with a stable reason string
//! and a process exit code.
//!
//! | Exit | Codes |
//! |------|-------|
//! | 2 | `INVALID_CONFIG` |
//! | 3 | `INVALID_INPUT` |
//! | 4 | `CEILING_EXCEEDED`, `ACCOUNT_MISCONFIGURED`, `LEVEL_INSUFFICIENT` |
//! | 5 | `UNDERLYING_NOT_OPTIONABLE`, `ASSET_NOT_FOUND`, `NO_MARKET_DATA` |
//! | 6 | `CONFIGURATION_CONFLICT` |
//! | 7 | `ORDER_REJECTED` |
//! | 8 | `AUTHENTICATION_FAILED`, `RATE_LIMITED`, `BROKER_API_ERROR` |
//! | 1 | `INTERNAL_ERROR` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{AccountError, BrokerError, MarketDataError};
use crate::application::use_cases::{InspectAccountError, RunOverwriteError};
use crate::config::ConfigError;
use crate::domain::risk_management::ViolationReason;

/// Error codes for the overwrite engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration could not be loaded or failed validation.
    InvalidConfig,
    /// Run parameters or eligibility inputs were invalid.
    InvalidInput,

    // Risk gate
    /// Desired level above the policy ceiling.
    CeilingExceeded,
    /// Account has no options level configured.
    AccountMisconfigured,
    /// Effective level does not allow covered calls.
    LevelInsufficient,

    /// Underlying has no listed options.
    UnderlyingNotOptionable,
    /// Asset unknown to the broker.
    AssetNotFound,
    /// No quote or trade for a symbol.
    NoMarketData,
    /// Options level changed between read and write.
    ConfigurationConflict,
    /// Order rejected by broker.
    OrderRejected,
    /// Credentials rejected.
    AuthenticationFailed,
    /// Rate limit exceeded.
    RateLimited,
    /// Broker transport or API error.
    BrokerApiError,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::InvalidInput => "INVALID_INPUT",
            Self::CeilingExceeded => "CEILING_EXCEEDED",
            Self::AccountMisconfigured => "ACCOUNT_MISCONFIGURED",
            Self::LevelInsufficient => "LEVEL_INSUFFICIENT",
            Self::UnderlyingNotOptionable => "UNDERLYING_NOT_OPTIONABLE",
            Self::AssetNotFound => "ASSET_NOT_FOUND",
            Self::NoMarketData => "NO_MARKET_DATA",
            Self::ConfigurationConflict => "CONFIGURATION_CONFLICT",
            Self::OrderRejected => "ORDER_REJECTED",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::RateLimited => "RATE_LIMITED",
            Self::BrokerApiError => "BROKER_API_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InternalError => 1,
            Self::InvalidConfig => 2,
            Self::InvalidInput => 3,
            Self::CeilingExceeded | Self::AccountMisconfigured | Self::LevelInsufficient => 4,
            Self::UnderlyingNotOptionable | Self::AssetNotFound | Self::NoMarketData => 5,
            Self::ConfigurationConflict => 6,
            Self::OrderRejected => 7,
            Self::AuthenticationFailed | Self::RateLimited | Self::BrokerApiError => 8,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A coded error with context.
#[derive(Debug, Error, Serialize)]
pub struct EngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

impl From<AccountError> for EngineError {
    fn from(err: AccountError) -> Self {
        let code = match &err {
            AccountError::Conflict { .. } => ErrorCode::ConfigurationConflict,
            AccountError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            AccountError::RateLimited => ErrorCode::RateLimited,
            AccountError::ConnectionError { .. } | AccountError::Unknown { .. } => {
                ErrorCode::BrokerApiError
            }
        };
        Self::new(code, err.to_string())
    }
}

impl From<BrokerError> for EngineError {
    fn from(err: BrokerError) -> Self {
        let code = match &err {
            BrokerError::OrderRejected { .. } => ErrorCode::OrderRejected,
            BrokerError::AssetNotFound { .. } => ErrorCode::AssetNotFound,
            BrokerError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            BrokerError::RateLimited => ErrorCode::RateLimited,
            BrokerError::ConnectionError { .. } | BrokerError::Unknown { .. } => {
                ErrorCode::BrokerApiError
            }
        };
        Self::new(code, err.to_string())
    }
}

impl From<MarketDataError> for EngineError {
    fn from(err: MarketDataError) -> Self {
        let code = match &err {
            MarketDataError::NoData { .. } => ErrorCode::NoMarketData,
            MarketDataError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            MarketDataError::RateLimited => ErrorCode::RateLimited,
            MarketDataError::ConnectionError { .. } | MarketDataError::Unknown { .. } => {
                ErrorCode::BrokerApiError
            }
        };
        Self::new(code, err.to_string())
    }
}

impl From<RunOverwriteError> for EngineError {
    fn from(err: RunOverwriteError) -> Self {
        match err {
            RunOverwriteError::Selection(e) => Self::new(ErrorCode::InvalidInput, e.to_string()),
            RunOverwriteError::Domain(e) => Self::new(ErrorCode::InvalidInput, e.to_string()),
            RunOverwriteError::Risk(violation) => {
                let code = match violation.reason {
                    ViolationReason::CeilingExceeded => ErrorCode::CeilingExceeded,
                    ViolationReason::AccountMisconfigured => ErrorCode::AccountMisconfigured,
                    ViolationReason::LevelInsufficient => ErrorCode::LevelInsufficient,
                };
                Self::new(code, violation.message)
            }
            RunOverwriteError::UnderlyingNotOptionable { symbol } => Self::new(
                ErrorCode::UnderlyingNotOptionable,
                format!("{symbol} has no listed options"),
            )
            .with_context("symbol", symbol.as_str()),
            RunOverwriteError::Account(e) => e.into(),
            RunOverwriteError::Broker(e) => e.into(),
            RunOverwriteError::MarketData(e) => e.into(),
        }
    }
}

impl From<InspectAccountError> for EngineError {
    fn from(err: InspectAccountError) -> Self {
        match err {
            InspectAccountError::Account(e) => e.into(),
            InspectAccountError::Broker(e) => e.into(),
        }
    }
}
