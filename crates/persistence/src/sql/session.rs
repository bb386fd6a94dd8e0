//! Scoped database session
//!
//! One connection per repository operation: opened at the start, closed at the
//! end. Dropping a session that was never closed still releases the connection.

use crate::config::DatabaseConfig;
use crate::error::{PersistenceError, PersistenceResult};
use sqlx::any::install_default_drivers;
use sqlx::AnyConnection;
use sqlx::Connection;

/// Diagnostic data reported by the server when a session opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Backend product name (e.g. "SQLite", "MySQL")
    pub product: String,
    /// Server version string
    pub version: String,
    /// Driver used to talk to it
    pub driver: String,
}

/// A single open connection
pub struct Session {
    conn: Option<AnyConnection>,
    info: ServerInfo,
    target: String,
}

impl Session {
    /// Open a connection to the configured store.
    ///
    /// A failure here is a `PersistenceError::Connection`.
    pub async fn open(config: &DatabaseConfig) -> PersistenceResult<Self> {
        install_default_drivers();

        let target = config.redacted_url();
        let mut conn = AnyConnection::connect(&config.connection_url())
            .await
            .map_err(PersistenceError::Connection)?;

        let info = probe_server(&mut conn).await;
        tracing::info!(
            target_url = %target,
            product = %info.product,
            version = %info.version,
            driver = %info.driver,
            "Database session opened"
        );

        Ok(Self {
            conn: Some(conn),
            info,
            target,
        })
    }

    /// Live connection handle
    pub fn connection(&mut self) -> PersistenceResult<&mut AnyConnection> {
        self.conn.as_mut().ok_or(PersistenceError::SessionClosed)
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection. Closing twice is a no-op.
    pub async fn close(&mut self) -> PersistenceResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            tracing::debug!(target_url = %self.target, "Database session closed");
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            tracing::debug!(target_url = %self.target, "Database session dropped without close");
        }
    }
}

async fn probe_server(conn: &mut AnyConnection) -> ServerInfo {
    let product = conn.backend_name().to_string();
    let version_sql = match product.as_str() {
        "SQLite" => "SELECT sqlite_version()",
        _ => "SELECT VERSION()",
    };

    let version = match sqlx::query_scalar::<_, String>(version_sql)
        .fetch_one(&mut *conn)
        .await
    {
        Ok(version) => version,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read server version");
            "unknown".to_string()
        }
    };

    ServerInfo {
        driver: format!("sqlx-{}", product.to_lowercase()),
        product,
        version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_reports_server_info() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig::sqlite(dir.path().join("agenda.db"));

        let mut session = Session::open(&config).await.unwrap();
        assert!(session.is_open());
        assert_eq!(session.info().product, "SQLite");
        assert_eq!(session.info().driver, "sqlx-sqlite");
        assert_ne!(session.info().version, "unknown");

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig::sqlite(dir.path().join("agenda.db"));

        let mut session = Session::open(&config).await.unwrap();
        session.close().await.unwrap();
        session.close().await.unwrap();

        assert!(!session.is_open());
        assert!(matches!(
            session.connection(),
            Err(PersistenceError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_open_unreachable_is_connection_error() {
        let dir = tempdir().unwrap();
        // Parent directory does not exist, so SQLite cannot create the file.
        let config = DatabaseConfig::sqlite(dir.path().join("missing").join("agenda.db"));

        let err = Session::open(&config).await.err().unwrap();
        assert!(err.is_connection_error());
    }
}
