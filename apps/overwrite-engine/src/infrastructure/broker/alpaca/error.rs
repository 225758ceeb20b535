//! Alpaca-specific error types.

use thiserror::Error;

use crate::application::ports::{AccountError, BrokerError, MarketDataError};

/// Errors from the Alpaca adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlpacaError {
    /// HTTP request could not be built or sent.
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned an error.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: String,
        /// Error message from the API.
        message: String,
    },

    /// Order was rejected (422).
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Authentication failed (401/403).
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// Trade updates stream failed (connect, protocol or close).
    #[error("Stream error: {0}")]
    Stream(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Failure seen on the final attempt.
        last_error: String,
    },

    /// Resource not found (404).
    #[error("Not found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// Response was well-formed JSON but unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured options level moved between read and write.
    #[error("Configuration conflict: expected level {expected}, found {actual:?}")]
    Conflict {
        /// Level the caller expected.
        expected: u8,
        /// Level found.
        actual: Option<u8>,
    },
}

impl From<AlpacaError> for AccountError {
    fn from(err: AlpacaError) -> Self {
        match err {
            AlpacaError::Http(message)
            | AlpacaError::Network(message)
            | AlpacaError::Stream(message)
            | AlpacaError::JsonParse(message) => Self::ConnectionError { message },
            err @ AlpacaError::MaxRetriesExceeded { .. } => Self::ConnectionError {
                message: err.to_string(),
            },
            AlpacaError::AuthenticationFailed => Self::AuthenticationFailed,
            AlpacaError::RateLimited { .. } => Self::RateLimited,
            AlpacaError::Conflict { expected, actual } => Self::Conflict { expected, actual },
            other => Self::Unknown {
                message: other.to_string(),
            },
        }
    }
}

impl From<AlpacaError> for BrokerError {
    fn from(err: AlpacaError) -> Self {
        match err {
            AlpacaError::Http(message)
            | AlpacaError::Network(message)
            | AlpacaError::Stream(message)
            | AlpacaError::JsonParse(message) => Self::ConnectionError { message },
            err @ AlpacaError::MaxRetriesExceeded { .. } => Self::ConnectionError {
                message: err.to_string(),
            },
            AlpacaError::OrderRejected(reason) => Self::OrderRejected { reason },
            AlpacaError::AuthenticationFailed => Self::AuthenticationFailed,
            AlpacaError::RateLimited { .. } => Self::RateLimited,
            AlpacaError::NotFound { path } => Self::AssetNotFound {
                symbol: path.rsplit('/').next().unwrap_or_default().to_string(),
            },
            other => Self::Unknown {
                message: other.to_string(),
            },
        }
    }
}

impl From<AlpacaError> for MarketDataError {
    fn from(err: AlpacaError) -> Self {
        match err {
            AlpacaError::Http(message)
            | AlpacaError::Network(message)
            | AlpacaError::Stream(message)
            | AlpacaError::JsonParse(message) => Self::ConnectionError { message },
            err @ AlpacaError::MaxRetriesExceeded { .. } => Self::ConnectionError {
                message: err.to_string(),
            },
            AlpacaError::AuthenticationFailed => Self::AuthenticationFailed,
            AlpacaError::RateLimited { .. } => Self::RateLimited,
            AlpacaError::NotFound { path } => Self::NoData { symbol: path },
            other => Self::Unknown {
                message: other.to_string(),
            },
        }
    }
}
