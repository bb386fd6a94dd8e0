//! # Agenda Core
//!
//! Core domain types: the `Person` value object and its validation errors.
//!
//! ```rust
//! use agenda_core::Person;
//!
//! let ana = Person::new("Ana", "Gomez", 30).unwrap();
//! assert_eq!(ana.to_string(), "Ana Gomez (30 years)");
//! assert!(Person::new("Ana", "Gomez", -1).is_err());
//! ```

pub mod error;
pub mod person;

pub use error::{CoreError, CoreResult};
pub use person::{Person, PersonKey};
