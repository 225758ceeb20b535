//! Contract type (call or put).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Option contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Call option (right to buy).
    #[default]
    #[serde(alias = "call")]
    Call,
    /// Put option (right to sell).
    #[serde(alias = "put")]
    Put,
}

impl ContractType {
    /// Wire value used by the broker's contract endpoints.
    #[must_use]
    pub const fn as_broker_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }

    /// Parse the broker's lowercase wire value.
    #[must_use]
    pub fn from_broker_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "call" | "c" => Some(Self::Call),
            "put" | "p" => Some(Self::Put),
            _ => None,
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}
