//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx and config errors.

use crate::config::ConfigError;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Connection errors ===
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Session already closed")]
    SessionClosed,

    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid row in {table}: {reason}")]
    RowMapping { table: &'static str, reason: String },

    // === Configuration errors ===
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Create a RowMapping error
    pub fn row_mapping(table: &'static str, reason: impl Into<String>) -> Self {
        Self::RowMapping {
            table,
            reason: reason.into(),
        }
    }

    /// Check whether the store could not be reached at all
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check whether a statement failed against a live connection
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::RowMapping { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_checks() {
        let err = PersistenceError::Connection(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection_error());
        assert!(!err.is_database_error());

        let err = PersistenceError::from(sqlx::Error::RowNotFound);
        assert!(err.is_database_error());

        let err = PersistenceError::row_mapping("Person", "edad out of range");
        assert_eq!(err.to_string(), "Invalid row in Person: edad out of range");
    }
}
