//! Person controller
//!
//! Drives the create, update and delete flows: validate the form, hand the
//! write to the store worker, and patch the in-memory list only once the store
//! reports success. The list is never touched on a failed write.

use crate::error::{BusinessError, BusinessResult};
use crate::form::{FlowState, FormFlow, FormOutcome, PersonForm};
use crate::view_model::{EntryId, PersonList};
use crate::worker::StoreHandle;
use agenda_core::{CoreError, Person};
use agenda_persistence::WriteOutcome;

const MSG_REQUIRED: &str = "All fields are required.";
const MSG_BAD_AGE: &str = "Age must be a valid number.";
const MSG_NEGATIVE_AGE: &str = "Age cannot be negative.";
const MSG_DUPLICATE: &str = "This person already exists in the list.";
const MSG_CREATED: &str = "Person added and saved to the database.";
const MSG_CREATE_FAILED: &str = "Could not save to the database.";
const MSG_SELECT_TO_MODIFY: &str = "Please select a person to modify.";
const MSG_SELECT_TO_DELETE: &str = "Please select a person to delete.";
const MSG_STALE: &str = "The selected person is no longer in the list.";
const MSG_UPDATED: &str = "Person updated successfully.";
const MSG_UPDATE_FAILED: &str = "Could not update the person in the database.";
const MSG_DELETED: &str = "Person deleted successfully.";
const MSG_DELETE_FAILED: &str = "Could not delete the person from the database.";
const MSG_LOAD_FAILED: &str = "Could not load the person list from the database.";

/// Owns the person list and talks to the store through the worker
pub struct PersonController {
    store: StoreHandle,
    list: PersonList,
}

impl PersonController {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            list: PersonList::new(),
        }
    }

    pub fn list(&self) -> &PersonList {
        &self.list
    }

    /// Initial load of the list from the store.
    ///
    /// On failure the list is left empty and the error is returned in the
    /// outcome.
    pub async fn load(&mut self) -> FormOutcome {
        match self.fetch().await {
            Ok(count) => FormOutcome::success(format!("Loaded {count} person(s)."), FlowState::Idle),
            Err(e) => {
                tracing::error!(error = %e, "Person list load failed");
                self.list.load(Vec::new());
                FormOutcome::failure(MSG_LOAD_FAILED, e)
            }
        }
    }

    /// Re-fetch from the store, discarding the in-memory list.
    ///
    /// Unlike `load`, a failed reload keeps the current list.
    pub async fn reload(&mut self) -> FormOutcome {
        match self.fetch().await {
            Ok(count) => {
                tracing::info!(count, "Person list reloaded");
                FormOutcome::success(format!("Reloaded {count} person(s)."), FlowState::Idle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Person list reload failed");
                FormOutcome::failure(MSG_LOAD_FAILED, e)
            }
        }
    }

    async fn fetch(&mut self) -> BusinessResult<usize> {
        let persons = self.store.list().await?.into_result()?;
        let count = persons.len();
        self.list.load(persons);
        Ok(count)
    }

    pub fn set_filter(&mut self, text: &str) {
        self.list.set_filter(text);
    }

    pub fn refresh(&mut self) {
        self.list.refresh();
    }

    /// Entries passing the current filter
    pub fn visible(&self) -> Vec<(EntryId, Person)> {
        self.list
            .visible()
            .map(|(id, person)| (id, person.clone()))
            .collect()
    }

    /// Persons whose name matches `filter`, in list order; all of them for `None`
    pub fn query(&self, filter: Option<&str>) -> Vec<Person> {
        self.list
            .filter(filter.unwrap_or(""))
            .into_iter()
            .cloned()
            .collect()
    }

    /// Form preloaded with the selected entry
    pub fn edit_form(&self, selected: Option<EntryId>) -> BusinessResult<PersonForm> {
        let id = selected.ok_or(BusinessError::NothingSelected)?;
        let person = self.list.get(id).ok_or(BusinessError::StaleSelection(id))?;
        Ok(PersonForm::from_person(person))
    }

    // ========================================================================
    // Create
    // ========================================================================

    pub async fn create(&mut self, form: &PersonForm) -> FormOutcome {
        let mut flow = FormFlow::new();
        let result = self.try_create(&mut flow, form).await;
        finish(flow, result, MSG_CREATED, MSG_CREATE_FAILED)
    }

    async fn try_create(&mut self, flow: &mut FormFlow, form: &PersonForm) -> BusinessResult<()> {
        flow.advance(FlowState::Validating)?;
        let person = validated(flow, form)?;
        if self.list.contains(&person) {
            flow.advance(FlowState::Invalid)?;
            return Err(BusinessError::Duplicate(person.to_string()));
        }

        flow.advance(FlowState::Submitting)?;
        let written = applied(self.store.insert(person.clone()).await);
        settle(flow, written)?;

        tracing::info!(%person, "Person created");
        self.list.add(person);
        Ok(())
    }

    // ========================================================================
    // Update
    // ========================================================================

    pub async fn update(&mut self, selected: Option<EntryId>, form: &PersonForm) -> FormOutcome {
        let Some(id) = selected else {
            return FormOutcome::invalid(MSG_SELECT_TO_MODIFY, BusinessError::NothingSelected);
        };
        let mut flow = FormFlow::new();
        let result = self.try_update(&mut flow, id, form).await;
        finish(flow, result, MSG_UPDATED, MSG_UPDATE_FAILED)
    }

    async fn try_update(
        &mut self,
        flow: &mut FormFlow,
        id: EntryId,
        form: &PersonForm,
    ) -> BusinessResult<()> {
        flow.advance(FlowState::Validating)?;
        let old_key = match self.list.get(id) {
            Some(person) => person.key(),
            None => {
                flow.advance(FlowState::Invalid)?;
                return Err(BusinessError::StaleSelection(id));
            }
        };
        let person = validated(flow, form)?;

        flow.advance(FlowState::Submitting)?;
        let written = applied(self.store.update(old_key.clone(), person.clone()).await);
        settle(flow, written)?;

        tracing::info!(key = %old_key, %person, "Person updated");
        self.list.update_in_place(id, &person)?;
        self.list.refresh();
        Ok(())
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Delete the selected entry. There is no confirmation step.
    pub async fn delete(&mut self, selected: Option<EntryId>) -> FormOutcome {
        let Some(id) = selected else {
            return FormOutcome::invalid(MSG_SELECT_TO_DELETE, BusinessError::NothingSelected);
        };
        let mut flow = FormFlow::new();
        let result = self.try_delete(&mut flow, id).await;
        finish(flow, result, MSG_DELETED, MSG_DELETE_FAILED)
    }

    async fn try_delete(&mut self, flow: &mut FormFlow, id: EntryId) -> BusinessResult<()> {
        flow.advance(FlowState::Validating)?;
        let key = match self.list.get(id) {
            Some(person) => person.key(),
            None => {
                flow.advance(FlowState::Invalid)?;
                return Err(BusinessError::StaleSelection(id));
            }
        };

        flow.advance(FlowState::Submitting)?;
        let written = applied(self.store.delete(key.clone()).await);
        settle(flow, written)?;

        tracing::info!(%key, "Person deleted");
        self.list.remove_entry(id);
        Ok(())
    }
}

fn validated(flow: &mut FormFlow, form: &PersonForm) -> BusinessResult<Person> {
    match form.validate() {
        Ok(person) => Ok(person),
        Err(e) => {
            flow.advance(FlowState::Invalid)?;
            Err(e.into())
        }
    }
}

/// Rows affected by a write that reached the store and matched something
fn applied(outcome: BusinessResult<WriteOutcome>) -> BusinessResult<u64> {
    match outcome? {
        WriteOutcome::Applied { rows_affected } => Ok(rows_affected),
        WriteOutcome::NoMatch => Err(BusinessError::NoMatch),
        WriteOutcome::Failed(e) => Err(e.into()),
    }
}

fn settle(flow: &mut FormFlow, written: BusinessResult<u64>) -> BusinessResult<()> {
    match written {
        Ok(_) => flow.advance(FlowState::Success),
        Err(e) => {
            flow.advance(FlowState::Failure)?;
            Err(e)
        }
    }
}

fn finish(
    mut flow: FormFlow,
    result: BusinessResult<()>,
    success: &str,
    store_failure: &str,
) -> FormOutcome {
    let error = match result {
        Ok(()) => {
            return match flow.advance(FlowState::Closed) {
                Ok(()) => FormOutcome::success(success, flow.state()),
                Err(e) => FormOutcome::failure(store_failure, e),
            };
        }
        Err(e) => e,
    };

    if matches!(flow.state(), FlowState::Invalid | FlowState::Failure) {
        // Back to Idle: the form stays open for another attempt.
        if let Err(e) = flow.advance(FlowState::Idle) {
            return FormOutcome::failure(store_failure, e);
        }
    }

    let rejected = match &error {
        BusinessError::Validation(core) => Some(validation_message(core)),
        BusinessError::Duplicate(_) => Some(MSG_DUPLICATE),
        BusinessError::StaleSelection(_) => Some(MSG_STALE),
        _ => None,
    };
    match rejected {
        Some(message) => FormOutcome::invalid(message, error),
        None => {
            tracing::warn!(error = %error, "{store_failure}");
            FormOutcome::failure(store_failure, error)
        }
    }
}

fn validation_message(error: &CoreError) -> &'static str {
    match error {
        CoreError::EmptyField(_) => MSG_REQUIRED,
        CoreError::InvalidAge(_) => MSG_BAD_AGE,
        CoreError::NegativeAge(_) => MSG_NEGATIVE_AGE,
    }
}
