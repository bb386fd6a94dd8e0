//! Repository implementations
//!
//! CRUD operations for the `Person` table. Every call opens its own session
//! and closes it before returning, on success and on failure alike.

use crate::config::DatabaseConfig;
use crate::error::PersistenceResult;
use crate::outcome::{ListOutcome, WriteOutcome};
use crate::sql::schema::*;
use crate::sql::session::{ServerInfo, Session};
use agenda_core::{Person, PersonKey};
use std::sync::Arc;

// ============================================================================
// Person Repository
// ============================================================================

/// Repository for the Person table
#[derive(Debug, Clone)]
pub struct PersonRepo {
    config: Arc<DatabaseConfig>,
}

impl PersonRepo {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Load every person, in store order
    pub async fn list(&self) -> ListOutcome {
        match self.try_list().await {
            Ok(persons) => {
                tracing::debug!(count = persons.len(), "Person list loaded");
                ListOutcome::loaded(persons)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load person list");
                ListOutcome::failed(e)
            }
        }
    }

    /// Insert a new person
    pub async fn insert(&self, person: &Person) -> WriteOutcome {
        let result = self.try_insert(person).await;
        log_write("insert", &person.key(), result)
    }

    /// Overwrite the row(s) addressed by `key` with `person`
    pub async fn update(&self, key: &PersonKey, person: &Person) -> WriteOutcome {
        let result = self.try_update(key, person).await;
        log_write("update", key, result)
    }

    /// Delete the row(s) addressed by `key`
    pub async fn delete(&self, key: &PersonKey) -> WriteOutcome {
        let result = self.try_delete(key).await;
        log_write("delete", key, result)
    }

    async fn try_list(&self) -> PersistenceResult<Vec<Person>> {
        let mut session = Session::open(&self.config).await?;
        let result: PersistenceResult<Vec<Person>> = async {
            let rows = sqlx::query_as::<_, PersonRow>(SELECT_PERSONS)
                .fetch_all(session.connection()?)
                .await?;
            rows.into_iter().map(Person::try_from).collect()
        }
        .await;
        finish(session, result).await
    }

    async fn try_insert(&self, person: &Person) -> PersistenceResult<u64> {
        let mut session = Session::open(&self.config).await?;
        let result: PersistenceResult<u64> = async {
            let done = sqlx::query(INSERT_PERSON)
                .bind(person.name().to_string())
                .bind(person.surname().to_string())
                .bind(person.age())
                .execute(session.connection()?)
                .await?;
            Ok(done.rows_affected())
        }
        .await;
        finish(session, result).await
    }

    async fn try_update(&self, key: &PersonKey, person: &Person) -> PersistenceResult<u64> {
        let mut session = Session::open(&self.config).await?;
        let result: PersistenceResult<u64> = async {
            let done = sqlx::query(UPDATE_PERSON)
                .bind(person.name().to_string())
                .bind(person.surname().to_string())
                .bind(person.age())
                .bind(key.name.clone())
                .bind(key.surname.clone())
                .execute(session.connection()?)
                .await?;
            Ok(done.rows_affected())
        }
        .await;
        finish(session, result).await
    }

    async fn try_delete(&self, key: &PersonKey) -> PersistenceResult<u64> {
        let mut session = Session::open(&self.config).await?;
        let result: PersistenceResult<u64> = async {
            let done = sqlx::query(DELETE_PERSON)
                .bind(key.name.clone())
                .bind(key.surname.clone())
                .execute(session.connection()?)
                .await?;
            Ok(done.rows_affected())
        }
        .await;
        finish(session, result).await
    }
}

/// Close the session, then hand back the statement result.
/// A statement error wins over a close error.
async fn finish<T>(mut session: Session, result: PersistenceResult<T>) -> PersistenceResult<T> {
    let closed = session.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

fn log_write(op: &'static str, key: &PersonKey, result: PersistenceResult<u64>) -> WriteOutcome {
    match result {
        Ok(rows) => {
            let outcome = WriteOutcome::from_rows(rows);
            if outcome.is_success() {
                tracing::debug!(op, %key, rows, "Person write applied");
            } else {
                tracing::warn!(op, %key, "Person write matched no row");
            }
            outcome
        }
        Err(e) => {
            tracing::error!(op, %key, error = %e, "Person write failed");
            WriteOutcome::Failed(e)
        }
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Create the Person table if it does not exist yet
pub async fn ensure_schema(config: &DatabaseConfig) -> PersistenceResult<()> {
    let mut session = Session::open(config).await?;
    let result: PersistenceResult<()> = async {
        sqlx::query(CREATE_PERSON_TABLE)
            .execute(session.connection()?)
            .await?;
        Ok(())
    }
    .await;
    finish(session, result).await
}

/// Open and close one session; used as the startup probe
pub async fn probe(config: &DatabaseConfig) -> PersistenceResult<ServerInfo> {
    let mut session = Session::open(config).await?;
    let info = session.info().clone();
    session.close().await?;
    Ok(info)
}

/// Number of rows in the Person table
pub async fn count_persons(config: &DatabaseConfig) -> PersistenceResult<i64> {
    let mut session = Session::open(config).await?;
    let result: PersistenceResult<i64> = async {
        let count = sqlx::query_scalar::<_, i64>(COUNT_PERSONS)
            .fetch_one(session.connection()?)
            .await?;
        Ok(count)
    }
    .await;
    finish(session, result).await
}
