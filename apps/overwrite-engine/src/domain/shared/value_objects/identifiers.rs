//! Strongly-typed order identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(ClientOrderId, "Client-assigned order identifier sent with every order.");
define_id!(BrokerOrderId, "Broker-assigned order identifier.");

impl ClientOrderId {
    /// Generate a unique id tagged with the underlying it overwrites.
    ///
    /// Format: `cc-{UNDERLYING}-{uuid}` (well under the 128 character broker limit).
    #[must_use]
    pub fn for_overwrite(underlying: &str) -> Self {
        Self(format!(
            "cc-{}-{}",
            underlying.to_uppercase(),
            uuid::Uuid::new_v4().simple()
        ))
    }
}
