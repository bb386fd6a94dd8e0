//! Repository outcomes
//!
//! Repository calls never return `Err`: failures are folded into these types so
//! callers can branch on `is_success()` while the error detail stays available.

use crate::error::PersistenceError;
use agenda_core::Person;

/// Outcome of an insert, update or delete
#[derive(Debug)]
pub enum WriteOutcome {
    /// At least one row was affected
    Applied { rows_affected: u64 },
    /// The statement ran but matched no row
    NoMatch,
    /// The statement (or the connection) failed
    Failed(PersistenceError),
}

impl WriteOutcome {
    pub fn from_rows(rows_affected: u64) -> Self {
        if rows_affected == 0 {
            Self::NoMatch
        } else {
            Self::Applied { rows_affected }
        }
    }

    /// True iff at least one row was affected
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn rows_affected(&self) -> u64 {
        match self {
            Self::Applied { rows_affected } => *rows_affected,
            _ => 0,
        }
    }

    pub fn error(&self) -> Option<&PersistenceError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Outcome of loading the person list
#[derive(Debug)]
pub struct ListOutcome {
    persons: Vec<Person>,
    error: Option<PersistenceError>,
}

impl ListOutcome {
    pub fn loaded(persons: Vec<Person>) -> Self {
        Self {
            persons,
            error: None,
        }
    }

    pub fn failed(error: PersistenceError) -> Self {
        Self {
            persons: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn error(&self) -> Option<&PersistenceError> {
        self.error.as_ref()
    }

    /// Persons loaded; empty when the load failed
    pub fn into_persons(self) -> Vec<Person> {
        self.persons
    }

    pub fn into_result(self) -> Result<Vec<Person>, PersistenceError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.persons),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_outcome_from_rows() {
        assert!(!WriteOutcome::from_rows(0).is_success());
        assert!(WriteOutcome::from_rows(2).is_success());
        assert_eq!(WriteOutcome::from_rows(2).rows_affected(), 2);

        let failed = WriteOutcome::Failed(PersistenceError::SessionClosed);
        assert!(!failed.is_success());
        assert!(failed.error().is_some());
    }

    #[test]
    fn test_failed_list_degrades_to_empty() {
        let outcome = ListOutcome::failed(PersistenceError::SessionClosed);
        assert!(!outcome.is_success());
        assert!(outcome.persons().is_empty());
        assert!(outcome.into_persons().is_empty());
    }
}
