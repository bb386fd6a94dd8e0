//! Person form validation and flow state
//!
//! A form holds the raw text of the three fields. Each flow (create, update,
//! delete) walks the same state machine:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Success -> Closed
//!                  \            \
//!                   -> Invalid   -> Failure
//!                        |             |
//!                        v             v
//!                       Idle          Idle
//! ```

use crate::error::{BusinessError, BusinessResult};
use agenda_core::{CoreError, CoreResult, Person};

/// Raw field text as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub surname: String,
    pub age: String,
}

impl PersonForm {
    pub fn new(name: impl Into<String>, surname: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            age: age.into(),
        }
    }

    /// Form preloaded with an existing person (edit dialog)
    pub fn from_person(person: &Person) -> Self {
        Self::new(person.name(), person.surname(), person.age().to_string())
    }

    /// Turn the field text into a Person.
    ///
    /// Fields are trimmed; all three are required and the age must be a
    /// non-negative integer.
    pub fn validate(&self) -> CoreResult<Person> {
        let name = required("name", &self.name)?;
        let surname = required("surname", &self.surname)?;
        let age = parse_age(required("age", &self.age)?)?;
        Person::new(name, surname, age)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> CoreResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::EmptyField(field));
    }
    Ok(value)
}

fn parse_age(text: &str) -> CoreResult<i32> {
    let age: i64 = text
        .parse()
        .map_err(|_| CoreError::InvalidAge(text.to_string()))?;
    if age < 0 {
        return Err(CoreError::NegativeAge(age));
    }
    i32::try_from(age).map_err(|_| CoreError::InvalidAge(text.to_string()))
}

// ============================================================================
// Flow state machine
// ============================================================================

/// Where a form flow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Success,
    Failure,
    Closed,
}

impl FlowState {
    pub fn can_advance_to(self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Submitting)
                | (Validating, Invalid)
                | (Invalid, Idle)
                | (Submitting, Success)
                | (Submitting, Failure)
                | (Failure, Idle)
                | (Success, Closed)
        )
    }

    /// The form is still open and waiting for input
    pub fn is_open(self) -> bool {
        !matches!(self, FlowState::Success | FlowState::Closed)
    }
}

/// Tracks one run through the state machine
#[derive(Debug, Clone)]
pub struct FormFlow {
    state: FlowState,
    history: Vec<FlowState>,
}

impl Default for FormFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            history: vec![FlowState::Idle],
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`
    pub fn history(&self) -> &[FlowState] {
        &self.history
    }

    pub fn advance(&mut self, next: FlowState) -> BusinessResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(BusinessError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

// ============================================================================
// Flow outcome
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    /// Rejected before reaching the store
    Invalid,
    /// The store (or the worker) reported failure
    Failure,
}

/// Result handed back to the presentation layer
#[derive(Debug)]
pub struct FormOutcome {
    pub status: OutcomeStatus,
    /// Human-readable message for the dialog
    pub message: String,
    /// Final flow state
    pub state: FlowState,
    /// Detail behind a non-success outcome
    pub error: Option<BusinessError>,
}

impl FormOutcome {
    pub fn success(message: impl Into<String>, state: FlowState) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
            state,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>, error: BusinessError) -> Self {
        Self {
            status: OutcomeStatus::Invalid,
            message: message.into(),
            state: FlowState::Idle,
            error: Some(error),
        }
    }

    pub fn failure(message: impl Into<String>, error: BusinessError) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            message: message.into(),
            state: FlowState::Idle,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Whether the dialog hosting the form should close
    pub fn close_form(&self) -> bool {
        !self.state.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let form = PersonForm::new(" Ana ", "Gomez", " 30");
        assert_eq!(form.validate().unwrap(), Person::new("Ana", "Gomez", 30).unwrap());
    }

    #[test]
    fn test_validate_required_fields() {
        assert_eq!(
            PersonForm::new("", "Gomez", "30").validate(),
            Err(CoreError::EmptyField("name"))
        );
        assert_eq!(
            PersonForm::new("Ana", "   ", "30").validate(),
            Err(CoreError::EmptyField("surname"))
        );
        assert_eq!(
            PersonForm::new("Ana", "Gomez", "").validate(),
            Err(CoreError::EmptyField("age"))
        );
    }

    #[test]
    fn test_validate_age() {
        assert_eq!(
            PersonForm::new("Ana", "Gomez", "treinta").validate(),
            Err(CoreError::InvalidAge("treinta".to_string()))
        );
        assert_eq!(
            PersonForm::new("Ana", "Gomez", "-4").validate(),
            Err(CoreError::NegativeAge(-4))
        );
        assert_eq!(
            PersonForm::new("Ana", "Gomez", "99999999999").validate(),
            Err(CoreError::InvalidAge("99999999999".to_string()))
        );
        assert_eq!(
            PersonForm::new("Ana", "Gomez", "3.5").validate(),
            Err(CoreError::InvalidAge("3.5".to_string()))
        );
    }

    #[test]
    fn test_from_person_round_trip() {
        let ana = Person::new("Ana", "Gomez", 30).unwrap();
        let form = PersonForm::from_person(&ana);
        assert_eq!(form.age, "30");
        assert_eq!(form.validate().unwrap(), ana);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut flow = FormFlow::new();
        for next in [
            FlowState::Validating,
            FlowState::Submitting,
            FlowState::Success,
            FlowState::Closed,
        ] {
            flow.advance(next).unwrap();
        }
        assert_eq!(flow.state(), FlowState::Closed);
        assert_eq!(flow.history().len(), 5);
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let mut flow = FormFlow::new();
        flow.advance(FlowState::Validating).unwrap();
        flow.advance(FlowState::Submitting).unwrap();
        flow.advance(FlowState::Failure).unwrap();
        flow.advance(FlowState::Idle).unwrap();
        assert!(flow.state().is_open());
    }

    #[test]
    fn test_illegal_transitions() {
        let mut flow = FormFlow::new();
        assert!(flow.advance(FlowState::Submitting).is_err());
        assert!(flow.advance(FlowState::Closed).is_err());

        flow.advance(FlowState::Validating).unwrap();
        flow.advance(FlowState::Invalid).unwrap();
        let err = flow.advance(FlowState::Success).unwrap_err();
        assert!(matches!(
            err,
            BusinessError::IllegalTransition {
                from: FlowState::Invalid,
                to: FlowState::Success
            }
        ));
        assert_eq!(flow.state(), FlowState::Invalid);
    }
}
