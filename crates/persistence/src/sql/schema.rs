//! Database schema definitions
//!
//! Row types for sqlx mapping and the statements issued against the
//! `Person` table. Column names follow the existing table
//! (`nombre`, `apellidos`, `edad`).

use crate::error::PersistenceError;
use agenda_core::Person;

/// Table holding person rows
pub const PERSON_TABLE: &str = "Person";

pub const CREATE_PERSON_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS Person (
        nombre TEXT NOT NULL,
        apellidos TEXT NOT NULL,
        edad INTEGER NOT NULL
    )
"#;

pub const SELECT_PERSONS: &str = "SELECT nombre, apellidos, edad FROM Person";

pub const INSERT_PERSON: &str = "INSERT INTO Person (nombre, apellidos, edad) VALUES (?, ?, ?)";

pub const UPDATE_PERSON: &str =
    "UPDATE Person SET nombre = ?, apellidos = ?, edad = ? WHERE nombre = ? AND apellidos = ?";

pub const DELETE_PERSON: &str = "DELETE FROM Person WHERE nombre = ? AND apellidos = ?";

pub const COUNT_PERSONS: &str = "SELECT COUNT(*) FROM Person";

/// Row type for the `Person` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PersonRow {
    pub nombre: String,
    pub apellidos: String,
    pub edad: i64,
}

// === Conversion implementations ===

impl From<&Person> for PersonRow {
    fn from(person: &Person) -> Self {
        Self {
            nombre: person.name().to_string(),
            apellidos: person.surname().to_string(),
            edad: person.age() as i64,
        }
    }
}

impl TryFrom<PersonRow> for Person {
    type Error = PersistenceError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let edad = i32::try_from(row.edad).map_err(|_| {
            PersistenceError::row_mapping(PERSON_TABLE, format!("edad {} out of range", row.edad))
        })?;
        Person::new(row.nombre, row.apellidos, edad)
            .map_err(|e| PersistenceError::row_mapping(PERSON_TABLE, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let person = Person::new("Ana", "Gomez", 30).unwrap();
        let row = PersonRow::from(&person);
        assert_eq!(row.edad, 30);
        assert_eq!(Person::try_from(row).unwrap(), person);
    }

    #[test]
    fn test_invalid_rows_rejected() {
        let negative = PersonRow {
            nombre: "Ana".to_string(),
            apellidos: "Gomez".to_string(),
            edad: -2,
        };
        assert!(matches!(
            Person::try_from(negative),
            Err(PersistenceError::RowMapping { .. })
        ));

        let too_old = PersonRow {
            nombre: "Ana".to_string(),
            apellidos: "Gomez".to_string(),
            edad: i64::from(i32::MAX) + 1,
        };
        assert!(Person::try_from(too_old).is_err());
    }
}
