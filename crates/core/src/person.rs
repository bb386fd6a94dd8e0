//! # Person Module
//!
//! The `Person` value object (name, surname, age) and its natural key.
//!
//! Rows in the store have no surrogate id, so update and delete address a
//! person by `PersonKey` (name + surname). Two people sharing that pair cannot
//! be told apart by the store.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Natural key used in `WHERE` clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonKey {
    pub name: String,
    pub surname: String,
}

impl PersonKey {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
        }
    }
}

impl fmt::Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.surname)
    }
}

/// A person record.
///
/// Equality and hashing are structural over all three fields. The age
/// invariant (`age >= 0`) holds for every observable value: fields are
/// private and the setters validate before writing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    name: String,
    surname: String,
    age: i32,
}

impl Person {
    /// Create a Person, rejecting negative ages
    pub fn new(name: impl Into<String>, surname: impl Into<String>, age: i32) -> CoreResult<Self> {
        Self::check_age(age)?;
        Ok(Self {
            name: name.into(),
            surname: surname.into(),
            age,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    /// Natural key (name + surname)
    pub fn key(&self) -> PersonKey {
        PersonKey::new(self.name.clone(), self.surname.clone())
    }

    /// True when `key` addresses this person
    pub fn has_key(&self, key: &PersonKey) -> bool {
        self.name == key.name && self.surname == key.surname
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_surname(&mut self, surname: impl Into<String>) {
        self.surname = surname.into();
    }

    /// Set the age; a negative value leaves the person untouched
    pub fn set_age(&mut self, age: i32) -> CoreResult<()> {
        Self::check_age(age)?;
        self.age = age;
        Ok(())
    }

    /// Overwrite all three fields from `other`
    pub fn assign(&mut self, other: &Person) {
        self.name.clone_from(&other.name);
        self.surname.clone_from(&other.surname);
        self.age = other.age;
    }

    fn check_age(age: i32) -> CoreResult<()> {
        if age < 0 {
            return Err(CoreError::NegativeAge(age as i64));
        }
        Ok(())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} years)", self.name, self.surname, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(person: &Person) -> u64 {
        let mut hasher = DefaultHasher::new();
        person.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_person_creation() {
        for (name, surname, age) in [("Ana", "Gomez", 30), ("Luis", "Perez Diaz", 0), ("", "", i32::MAX)] {
            let person = Person::new(name, surname, age).unwrap();
            assert_eq!(person.name(), name);
            assert_eq!(person.surname(), surname);
            assert_eq!(person.age(), age);
        }
    }

    #[test]
    fn test_negative_age_rejected() {
        for age in [-1, -30, i32::MIN] {
            let err = Person::new("Ana", "Gomez", age).unwrap_err();
            assert_eq!(err, CoreError::NegativeAge(age as i64));
        }
    }

    #[test]
    fn test_set_age_keeps_invariant() {
        let mut person = Person::new("Ana", "Gomez", 30).unwrap();
        assert!(person.set_age(-5).is_err());
        assert_eq!(person.age(), 30);

        person.set_age(31).unwrap();
        assert_eq!(person.age(), 31);
    }

    #[test]
    fn test_structural_equality() {
        let a = Person::new("Ana", "Gomez", 30).unwrap();
        let b = Person::new("Ana", "Gomez", 30).unwrap();
        let older = Person::new("Ana", "Gomez", 31).unwrap();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, older);
        assert_eq!(a.key(), older.key());
        assert!(older.has_key(&PersonKey::new("Ana", "Gomez")));
    }

    #[test]
    fn test_assign_overwrites_all_fields() {
        let mut person = Person::new("Ana", "Gomez", 30).unwrap();
        let renamed = Person::new("Ana Maria", "Gomez Ruiz", 31).unwrap();
        person.assign(&renamed);
        assert_eq!(person, renamed);
    }

    #[test]
    fn test_person_display() {
        let person = Person::new("Ana", "Gomez", 30).unwrap();
        assert_eq!(format!("{}", person), "Ana Gomez (30 years)");
        assert_eq!(person.key().to_string(), "Ana Gomez");
    }
}
