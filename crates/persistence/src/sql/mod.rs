//! SQL persistence module
//!
//! Scoped sessions and the repository for the `Person` table.

pub mod repos;
pub mod schema;
pub mod session;

pub use repos::{count_persons, ensure_schema, probe, PersonRepo};
pub use schema::PersonRow;
pub use session::{ServerInfo, Session};
