//! # Error Module
//!
//! Domain errors for Agenda using thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// All of them are validation failures: they are recovered locally and shown
/// to the user, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Field '{0}' is required")]
    EmptyField(&'static str),

    #[error("Age must be a valid number: {0}")]
    InvalidAge(String),

    #[error("Age cannot be negative: {0}")]
    NegativeAge(i64),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Every core error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyField(_) | CoreError::InvalidAge(_) | CoreError::NegativeAge(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NegativeAge(-3);
        assert_eq!(err.to_string(), "Age cannot be negative: -3");

        let err = CoreError::EmptyField("surname");
        assert_eq!(err.to_string(), "Field 'surname' is required");
    }

    #[test]
    fn test_every_error_is_validation() {
        assert!(CoreError::EmptyField("name").is_validation());
        assert!(CoreError::InvalidAge("abc".to_string()).is_validation());
        assert!(CoreError::NegativeAge(-1).is_validation());
    }
}
