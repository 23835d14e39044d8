//! Error types for hardware operations.
//!
//! The variants follow the failure taxonomy of the coordination layer:
//! validation errors and the busy condition abort the caller's operation and
//! are never retried internally; configuration errors fail fast; bus
//! communication errors are the transient class a caller may decide to
//! log-and-continue over.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while coordinating access to the appliance.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// A caller-supplied value failed validation.
    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// Another session already holds the lines.
    ///
    /// Surfaced as a distinct condition so callers can tell "try again
    /// later" apart from a bad request. The layer itself never retries.
    #[error("Device is busy: another session holds the hardware lines")]
    DeviceBusy,

    /// Pin setup or teardown failed.
    #[error("Pin configuration failed: {message}")]
    Configuration { message: String },

    /// A bus transaction failed.
    #[error("Bus communication error: {message}")]
    Communication { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new invalid value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication {
            message: message.into(),
        }
    }

    /// True for the busy condition.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::DeviceBusy)
    }

    /// True for errors that should never be retried (bad input).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}

impl From<mokka_core::Error> for HardwareError {
    fn from(err: mokka_core::Error) -> Self {
        Self::InvalidValue {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_error() {
        let error = HardwareError::invalid_value("doses must be 1 or 2, got 5");
        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Invalid value: doses must be 1 or 2, got 5");
    }

    #[test]
    fn test_busy_error_is_distinct() {
        let error = HardwareError::DeviceBusy;
        assert!(error.is_busy());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_domain_error_converts_to_validation() {
        let core_err = mokka_core::validate_percent(150, 0).unwrap_err();
        let error: HardwareError = core_err.into();
        assert!(error.is_validation());
        assert!(error.to_string().contains("150"));
    }
}
