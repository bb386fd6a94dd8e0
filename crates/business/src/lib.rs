//! # Agenda Business
//!
//! Business logic layer - the in-memory person list, form validation and the
//! create/update/delete flows that keep the list in step with the store.
//!
//! ```text
//! PersonController ──> StoreHandle ──mpsc──> StoreWorker ──> PersonRepo ──> SQL
//!        │                  ^                     │
//!        v                  └──────oneshot────────┘
//!    PersonList (entries + filtered view)
//! ```

pub mod controller;
pub mod error;
pub mod form;
pub mod view_model;
pub mod worker;

pub use controller::PersonController;
pub use error::{BusinessError, BusinessResult};
pub use form::{FlowState, FormFlow, FormOutcome, OutcomeStatus, PersonForm};
pub use view_model::{EntryId, PersonList};
pub use worker::{StoreHandle, StoreWorker, StoreWorkerQuitHandle};
