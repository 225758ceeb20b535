//! Symbol value object for instrument identifiers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Length of the OCC suffix: `YYMMDD` + `C`/`P` + 8 strike digits.
const OCC_SUFFIX_LEN: usize = 15;

/// Maximum OCC root length.
const OCC_MAX_ROOT_LEN: usize = 6;

/// A trading symbol (ticker or OCC option symbol).
///
/// Examples:
/// - Equity: "AAPL", "SPY"
/// - Option: "AAPL240216C00190000" (OCC format, no root padding)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

/// Components of an OCC option symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccParts {
    /// Option root (normally the underlying ticker).
    pub root: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// `true` for calls, `false` for puts.
    pub is_call: bool,
    /// Strike price.
    pub strike: Decimal,
}

impl Symbol {
    /// Create a new Symbol, normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the symbol as an OCC option symbol.
    ///
    /// Returns `None` for equities and malformed option symbols.
    #[must_use]
    pub fn occ_parts(&self) -> Option<OccParts> {
        let s = self.0.as_str();
        if !s.is_ascii() || s.len() <= OCC_SUFFIX_LEN || s.len() > OCC_SUFFIX_LEN + OCC_MAX_ROOT_LEN {
            return None;
        }

        let (root, suffix) = s.split_at(s.len() - OCC_SUFFIX_LEN);
        let (date, rest) = suffix.split_at(6);
        let (right, strike) = rest.split_at(1);

        if !root.chars().all(|c| c.is_ascii_alphabetic())
            || !date.chars().all(|c| c.is_ascii_digit())
            || !strike.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let is_call = match right {
            "C" => true,
            "P" => false,
            _ => return None,
        };

        let expiration = NaiveDate::parse_from_str(&format!("20{date}"), "%Y%m%d").ok()?;
        let strike_millis: i64 = strike.parse().ok()?;

        Some(OccParts {
            root: root.to_string(),
            expiration,
            is_call,
            strike: Decimal::new(strike_millis, 3).normalize(),
        })
    }

    /// Check if this is an option symbol (OCC format).
    #[must_use]
    pub fn is_option(&self) -> bool {
        self.occ_parts().is_some()
    }

    /// Extract the underlying symbol from an option.
    ///
    /// Returns the symbol unchanged if it is not an option.
    #[must_use]
    pub fn underlying(&self) -> Self {
        self.occ_parts()
            .map_or_else(|| self.clone(), |parts| Self(parts.root))
    }

    /// Validate the symbol before it is sent to a broker.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::InvalidValue {
                field: "symbol".to_string(),
                message: "Symbol cannot be empty".to_string(),
            });
        }

        // Class shares use a dot (BRK.B)
        if !self.0.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err(DomainError::InvalidValue {
                field: "symbol".to_string(),
                message: format!("Symbol '{}' contains invalid characters", self.0),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
