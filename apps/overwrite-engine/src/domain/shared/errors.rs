//! Domain errors shared across bounded contexts.

use std::fmt;

/// Domain-level errors that are not part of a context's own taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Entity type (e.g., "RiskGateRun").
        entity: String,
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
    },

    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition { entity, from, to } => {
                write!(f, "Invalid state transition for {entity}: {from} -> {to}")
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_transition_display() {
        let err = DomainError::InvalidStateTransition {
            entity: "RiskGateRun".to_string(),
            from: "REJECTED".to_string(),
            to: "CONFIG_WRITTEN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition for RiskGateRun: REJECTED -> CONFIG_WRITTEN"
        );
    }

    #[test]
    fn invalid_value_display() {
        let err = DomainError::InvalidValue {
            field: "symbol".to_string(),
            message: "Symbol cannot be empty".to_string(),
        };
        assert!(err.to_string().contains("symbol"));
    }
}
