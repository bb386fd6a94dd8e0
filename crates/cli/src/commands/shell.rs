//! Interactive shell
//!
//! Keeps one loaded controller across commands. Rows are selected by the
//! 1-based number printed by `list`.

use agenda_business::{EntryId, PersonController, PersonForm};
use agenda_persistence::DatabaseConfig;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::commands::person::{print_table, report};
use crate::db::App;

type Input = Lines<BufReader<Stdin>>;

const HELP: &str = "\
Commands:
  list                         show the persons passing the filter
  filter [text]                filter by name; no text clears it
  add [name surname age]       add a person (prompts when fields are missing)
  edit <row>                   modify a row; empty input keeps the old value
  delete <row>                 delete a row
  refresh                      re-render without reloading
  reload                       fetch the list again from the database
  help                         this text
  quit                         leave the shell";

/// Run the shell until `quit` or end of input
pub async fn run(config: &DatabaseConfig) -> Result<()> {
    let mut app = App::start(config).await?;
    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();

    println!("Agenda shell. Type 'help' for commands.");
    print_table(&app.controller.visible());

    loop {
        let Some(line) = prompt(&mut input, "agenda> ").await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        match command {
            "list" | "ls" => print_table(&app.controller.visible()),
            "filter" => {
                app.controller.set_filter(&args.join(" "));
                print_table(&app.controller.visible());
            }
            "add" => add(&mut app.controller, &mut input, &args).await?,
            "edit" => edit(&mut app.controller, &mut input, &args).await?,
            "delete" | "rm" => {
                let selected = select_row(&app.controller, &args);
                let outcome = app.controller.delete(selected).await;
                show(report(&outcome));
            }
            "refresh" => {
                app.controller.refresh();
                print_table(&app.controller.visible());
            }
            "reload" => {
                let outcome = app.controller.reload().await;
                show(report(&outcome));
                print_table(&app.controller.visible());
            }
            "help" | "?" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
    }

    app.shutdown().await
}

async fn add(controller: &mut PersonController, input: &mut Input, args: &[&str]) -> Result<()> {
    let form = match args {
        [name, surname, age] => PersonForm::new(*name, *surname, *age),
        _ => PersonForm::new(
            ask(input, "Name: ").await?,
            ask(input, "Surname: ").await?,
            ask(input, "Age: ").await?,
        ),
    };
    let outcome = controller.create(&form).await;
    show(report(&outcome));
    Ok(())
}

async fn edit(controller: &mut PersonController, input: &mut Input, args: &[&str]) -> Result<()> {
    let selected = select_row(controller, args);
    let mut form = match controller.edit_form(selected) {
        Ok(form) => form,
        Err(_) => {
            // Let the controller produce the selection message.
            let outcome = controller.update(selected, &PersonForm::default()).await;
            show(report(&outcome));
            return Ok(());
        }
    };

    form.name = ask_or_keep(input, "Name", form.name).await?;
    form.surname = ask_or_keep(input, "Surname", form.surname).await?;
    form.age = ask_or_keep(input, "Age", form.age).await?;

    let outcome = controller.update(selected, &form).await;
    show(report(&outcome));
    Ok(())
}

/// Entry behind a 1-based row number of the visible list
fn select_row(controller: &PersonController, args: &[&str]) -> Option<EntryId> {
    let row: usize = args.first()?.parse().ok()?;
    controller
        .visible()
        .get(row.checked_sub(1)?)
        .map(|(id, _)| *id)
}

fn show(result: Result<()>) {
    if let Err(e) = result {
        println!("❌ {e}");
    }
}

async fn prompt(input: &mut Input, text: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    input.next_line().await.context("Failed to read from stdin")
}

async fn ask(input: &mut Input, text: &str) -> Result<String> {
    Ok(prompt(input, text).await?.unwrap_or_default())
}

async fn ask_or_keep(input: &mut Input, field: &str, current: String) -> Result<String> {
    let answer = ask(input, &format!("{field} [{current}]: ")).await?;
    if answer.trim().is_empty() {
        Ok(current)
    } else {
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        for command in ["list", "filter", "add", "edit", "delete", "refresh", "reload", "quit"] {
            assert!(HELP.contains(command), "missing {command}");
        }
    }
}
