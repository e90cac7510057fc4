//! Error types for the onboarding core.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the onboarding state machine and its setters.
///
/// Setter failures leave the state untouched. `InvalidTransition` means the
/// rendering layer called a transition from the wrong step or phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid value for {field}: {value:?} (expected one of: {expected})")]
    InvalidEnum {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("Cannot {action} while at step {step} in phase {phase}")]
    InvalidTransition {
        action: &'static str,
        step: String,
        phase: String,
    },
}

/// Settings store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt settings file {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = OnboardingError::OutOfRange {
            field: "moodIndex",
            value: 5,
            min: 0,
            max: 4,
        };
        assert_eq!(err.to_string(), "moodIndex out of range: 5 (expected 0..=4)");
    }

    #[test]
    fn onboarding_error_converts_to_top_level() {
        let err: Error = OnboardingError::InvalidTransition {
            action: "finalize",
            step: "goals".into(),
            phase: "onboarding".into(),
        }
        .into();
        assert!(matches!(err, Error::Onboarding(_)));
        assert!(err.to_string().contains("Cannot finalize"));
    }
}
