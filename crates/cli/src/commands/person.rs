//! One-shot person commands
//!
//! Each command loads the list, runs one flow through the controller and
//! shuts the worker down again.

use agenda_business::{EntryId, FormOutcome, PersonController, PersonForm};
use agenda_core::{Person, PersonKey};
use agenda_persistence::DatabaseConfig;
use anyhow::{bail, Result};

use crate::db::App;

/// List persons, optionally filtered by name
pub async fn list(config: &DatabaseConfig, filter: Option<&str>) -> Result<()> {
    let mut app = App::start(config).await?;
    app.controller.set_filter(filter.unwrap_or(""));
    print_table(&app.controller.visible());
    app.shutdown().await
}

/// Add a person
pub async fn add(config: &DatabaseConfig, name: String, surname: String, age: String) -> Result<()> {
    let mut app = App::start(config).await?;
    let outcome = app.controller.create(&PersonForm::new(name, surname, age)).await;
    app.shutdown().await?;
    report(&outcome)
}

/// Modify the first person with this name and surname
pub async fn edit(
    config: &DatabaseConfig,
    name: &str,
    surname: &str,
    new_name: Option<String>,
    new_surname: Option<String>,
    new_age: Option<String>,
) -> Result<()> {
    let mut app = App::start(config).await?;
    let Some(id) = select_by_key(&app.controller, name, surname) else {
        app.shutdown().await?;
        bail!("No person named '{} {}'", name, surname);
    };

    let mut form = app.controller.edit_form(Some(id))?;
    if let Some(value) = new_name {
        form.name = value;
    }
    if let Some(value) = new_surname {
        form.surname = value;
    }
    if let Some(value) = new_age {
        form.age = value;
    }

    let outcome = app.controller.update(Some(id), &form).await;
    app.shutdown().await?;
    report(&outcome)
}

/// Delete the first person with this name and surname
pub async fn delete(config: &DatabaseConfig, name: &str, surname: &str) -> Result<()> {
    let mut app = App::start(config).await?;
    let selected = select_by_key(&app.controller, name, surname);
    let outcome = app.controller.delete(selected).await;
    app.shutdown().await?;
    report(&outcome)
}

fn select_by_key(controller: &PersonController, name: &str, surname: &str) -> Option<EntryId> {
    controller.list().find_by_key(&PersonKey::new(name, surname))
}

/// Print a flow outcome; a non-success outcome becomes an error
pub fn report(outcome: &FormOutcome) -> Result<()> {
    if outcome.is_success() {
        println!("✅ {}", outcome.message);
        return Ok(());
    }
    if let Some(e) = &outcome.error {
        tracing::debug!(error = %e, "Flow did not succeed");
    }
    bail!("{}", outcome.message)
}

/// Print rows numbered from 1
pub fn print_table(rows: &[(EntryId, Person)]) {
    if rows.is_empty() {
        println!("No persons found.");
        return;
    }

    println!("{:<4} {:<20} {:<24} {:>4}", "#", "Name", "Surname", "Age");
    println!("{}", "-".repeat(55));
    for (row, (_, person)) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:<24} {:>4}",
            row + 1,
            person.name(),
            person.surname(),
            person.age()
        );
    }
    println!();
    println!("{} person(s)", rows.len());
}
