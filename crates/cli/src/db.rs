//! Database initialization, status and controller startup

use agenda_business::{PersonController, StoreWorker, StoreWorkerQuitHandle};
use agenda_persistence::{count_persons, ensure_schema, probe, DatabaseConfig, Driver, PersonRepo};
use anyhow::{bail, Context, Result};

/// Create the Person table, and the database directory for SQLite
pub async fn init_database(config: &DatabaseConfig) -> Result<()> {
    if config.driver == Driver::Sqlite && config.url.is_none() {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    ensure_schema(config)
        .await
        .with_context(|| format!("Failed to initialize {}", config.redacted_url()))?;
    Ok(())
}

/// Open and close one session; any failure aborts the command
pub async fn startup_probe(config: &DatabaseConfig) -> Result<()> {
    probe(config).await.with_context(|| {
        format!(
            "Cannot reach the database at {} (run 'agenda init' for a new SQLite file)",
            config.redacted_url()
        )
    })?;
    Ok(())
}

/// Show database status
pub async fn show_status(config: &DatabaseConfig) -> Result<()> {
    let info = probe(config).await?;

    println!("📊 Database Status");
    println!("   URL:     {}", config.redacted_url());
    println!("   Server:  {} {}", info.product, info.version);
    println!("   Driver:  {}", info.driver);

    match count_persons(config).await {
        Ok(count) => println!("   Persons: {}", count),
        Err(e) => {
            tracing::debug!(error = %e, "Row count failed");
            println!("   Persons: Person table missing, run 'agenda init'");
        }
    }
    Ok(())
}

/// A loaded controller plus the worker behind it
pub struct App {
    pub controller: PersonController,
    quit: StoreWorkerQuitHandle,
}

impl App {
    /// Spawn the store worker and load the person list
    pub async fn start(config: &DatabaseConfig) -> Result<Self> {
        let (handle, quit) = StoreWorker::spawn(PersonRepo::new(config.clone()));
        let mut controller = PersonController::new(handle);

        let outcome = controller.load().await;
        let app = Self { controller, quit };
        if !outcome.is_success() {
            app.shutdown().await?;
            match outcome.error {
                Some(e) => bail!("{} ({})", outcome.message, e),
                None => bail!("{}", outcome.message),
            }
        }

        Ok(app)
    }

    /// Drop the controller and wait for the worker to drain
    pub async fn shutdown(self) -> Result<()> {
        let Self { controller, quit } = self;
        drop(controller);
        quit.quit().await.context("Store worker did not stop cleanly")?;
        Ok(())
    }
}
