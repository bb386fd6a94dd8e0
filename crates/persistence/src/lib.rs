//! # Agenda Persistence
//!
//! Persistence layer for Agenda - configuration, scoped SQL sessions and the
//! `Person` repository.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PersonRepo                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   Config    │ -> │   Session   │ -> │  SQL (sqlx Any) │ │
//! │  │ (toml/env)  │    │ (1 per op)  │    │ sqlite / mysql  │ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agenda_persistence::{AgendaConfig, PersonRepo};
//!
//! let config = AgendaConfig::load_or_default("agenda.toml")?;
//! let repo = PersonRepo::new(config.database);
//!
//! let persons = repo.list().await.into_persons();
//! if !repo.insert(&ana).await.is_success() { /* warn the user */ }
//! ```

pub mod config;
pub mod error;
pub mod outcome;
pub mod sql;

pub use config::{AgendaConfig, ConfigError, DatabaseConfig, Driver, LoggingConfig};
pub use error::{PersistenceError, PersistenceResult};
pub use outcome::{ListOutcome, WriteOutcome};
pub use sql::{count_persons, ensure_schema, probe, PersonRepo, PersonRow, ServerInfo, Session};
