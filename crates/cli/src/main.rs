//! Agenda CLI - person records from the command line
//!
//! Usage:
//! ```bash
//! agenda init
//! agenda status
//! agenda add Ana Gomez 30
//! agenda list --filter an
//! agenda edit Ana Gomez --age 31
//! agenda delete Ana Gomez
//! agenda shell
//! ```

use agenda_persistence::AgendaConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{person, shell};

/// Agenda - person records backed by a SQL table
#[derive(Parser)]
#[command(name = "agenda")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, env = "AGENDA_CONFIG", default_value = "agenda.toml", global = true)]
    pub config: PathBuf,

    /// Connection URL, overrides the configuration file
    #[arg(long, env = "AGENDA_DB_URL", global = true)]
    pub db_url: Option<String>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the Person table if it does not exist
    Init,

    /// Show connection details and row count
    Status,

    /// List persons
    List {
        /// Only names containing this text (case-insensitive)
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Add a person
    Add {
        name: String,
        surname: String,
        /// Age in years
        age: String,
    },

    /// Modify the first person with this name and surname
    Edit {
        name: String,
        surname: String,
        /// New name
        #[arg(long = "name")]
        new_name: Option<String>,
        /// New surname
        #[arg(long = "surname")]
        new_surname: Option<String>,
        /// New age
        #[arg(long = "age")]
        new_age: Option<String>,
    },

    /// Delete the first person with this name and surname
    Delete { name: String, surname: String },

    /// Interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AgendaConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    config.apply_env();
    if let Some(url) = &cli.db_url {
        config.database.url = Some(url.clone());
    }
    config
        .validate()
        .context("Invalid database settings (file, AGENDA_DB_* or --db-url)")?;

    init_tracing(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    let database = config.database;

    if !matches!(cli.command, Commands::Init) {
        db::startup_probe(&database).await?;
    }

    match cli.command {
        Commands::Init => {
            db::init_database(&database).await?;
            println!("✅ Person table ready at {}", database.redacted_url());
        }

        Commands::Status => {
            db::show_status(&database).await?;
        }

        Commands::List { filter } => {
            person::list(&database, filter.as_deref()).await?;
        }

        Commands::Add { name, surname, age } => {
            person::add(&database, name, surname, age).await?;
        }

        Commands::Edit {
            name,
            surname,
            new_name,
            new_surname,
            new_age,
        } => {
            person::edit(&database, &name, &surname, new_name, new_surname, new_age).await?;
        }

        Commands::Delete { name, surname } => {
            person::delete(&database, &name, &surname).await?;
        }

        Commands::Shell => {
            shell::run(&database).await?;
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
