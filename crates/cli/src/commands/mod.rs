//! CLI command handlers

pub mod person;
pub mod shell;
