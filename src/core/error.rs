//! Error types for the sky diagram core

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid path definition: {0}")]
    InvalidPath(String),

    #[error("track position must be finite, got {0}")]
    InvalidPosition(f64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("time cycle of {cycle} ATU overflows the safe integer range")]
    ConfigurationOverflow { cycle: u128 },

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Require a finite number, reporting `field` on failure.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::config(field, format!("must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_message() {
        let err = Error::InvalidTransition {
            state: "playing",
            action: "play",
        };
        assert_eq!(err.to_string(), "cannot play while playing");
    }

    #[test]
    fn test_require_finite() {
        assert_eq!(require_finite("peak", 0.5).unwrap(), 0.5);
        let err = require_finite("peak", f64::NAN).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "peak", .. }));
    }
}
