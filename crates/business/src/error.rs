//! Business layer errors

use crate::form::FlowState;
use crate::view_model::EntryId;
use agenda_core::CoreError;
use agenda_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Validation errors ===
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),

    #[error("Person already in the list: {0}")]
    Duplicate(String),

    // === Selection errors ===
    #[error("No person selected")]
    NothingSelected,

    #[error("Selected entry {0} is no longer in the list")]
    StaleSelection(EntryId),

    // === Store errors ===
    #[error("Store error: {0}")]
    Store(#[from] PersistenceError),

    #[error("No stored row matched the person")]
    NoMatch,

    #[error("Store worker is not running")]
    WorkerUnavailable,

    // === Flow errors ===
    #[error("Illegal form transition: {from:?} -> {to:?}")]
    IllegalTransition { from: FlowState, to: FlowState },
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Input problems the user can fix in the form
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Duplicate(_) | Self::NothingSelected
        )
    }

    /// Problems on the store side of the boundary
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_) | Self::NoMatch | Self::WorkerUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let err = BusinessError::from(CoreError::NegativeAge(-1));
        assert!(err.is_user_error());
        assert!(err.to_string().contains("negative"));

        assert!(BusinessError::NoMatch.is_store_error());
        assert!(BusinessError::from(PersistenceError::SessionClosed).is_store_error());
        assert!(!BusinessError::NothingSelected.is_store_error());
    }

    #[test]
    fn test_transition_display() {
        let err = BusinessError::IllegalTransition {
            from: FlowState::Idle,
            to: FlowState::Closed,
        };
        assert_eq!(err.to_string(), "Illegal form transition: Idle -> Closed");
    }
}
