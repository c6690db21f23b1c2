//! # cohort-db
//!
//! libSQL persistence for Cohort and the study workflow engine.
//!
//! Handles all relational state: studies and their append-only transition
//! log. The engine (`CohortService::execute_transition`) runs guard check,
//! state write, and log append inside one `IMMEDIATE` transaction, then fires
//! notification hooks once the transaction has committed.
//!
//! File databases hand out a fresh connection per operation and run in WAL
//! mode, so readers never wait on a writer and there is no process-wide lock.
//! `SQLite` still admits one writer at a time: concurrent transitions queue on
//! the database write lock for at most `busy_timeout` (capped by the
//! transition budget), not on anything held by this crate.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;
pub mod workflow;

#[cfg(test)]
mod test_support;

use std::ops::Deref;
use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

const IN_MEMORY: &str = ":memory:";

/// Central database handle for all Cohort state operations.
pub struct CohortDb {
    db: libsql::Database,
    busy_timeout: Duration,
    /// Only for `":memory:"`, where every `connect()` would open a new, empty
    /// database. Operations on an in-memory database take turns on this one.
    shared: Option<Mutex<libsql::Connection>>,
}

/// A connection checked out from [`CohortDb::connection`].
pub enum DbConnection<'a> {
    /// Opened for this operation and closed when dropped.
    Dedicated(libsql::Connection),
    /// The single connection of an in-memory database.
    Shared(MutexGuard<'a, libsql::Connection>),
}

impl Deref for DbConnection<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Dedicated(conn) => conn,
            Self::Shared(guard) => guard,
        }
    }
}

impl DbConnection<'_> {
    /// Cap how long the next statement waits for another writer to let go.
    ///
    /// No-op on a shared in-memory connection, which has nobody to wait for.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the pragma is refused.
    pub async fn limit_busy_wait(&self, wait: Duration) -> Result<(), DatabaseError> {
        match self {
            Self::Dedicated(conn) => set_busy_timeout(conn, wait).await,
            Self::Shared(_) => Ok(()),
        }
    }
}

/// Per-connection pragmas. `SQLite` does not persist either of them.
async fn configure(conn: &libsql::Connection, busy_timeout: Duration) -> Result<(), DatabaseError> {
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Query(format!("PRAGMA foreign_keys: {e}")))?;
    set_busy_timeout(conn, busy_timeout).await
}

/// Pragmas that echo their value back as a row go through `query`.
async fn pragma_query(conn: &libsql::Connection, pragma: &str) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(pragma, ())
        .await
        .map_err(|e| DatabaseError::Query(format!("{pragma}: {e}")))?;
    while rows.next().await?.is_some() {}
    Ok(())
}

async fn set_busy_timeout(conn: &libsql::Connection, wait: Duration) -> Result<(), DatabaseError> {
    pragma_query(conn, &format!("PRAGMA busy_timeout = {}", wait.as_millis())).await
}

impl CohortDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let in_memory = path == IN_MEMORY;

        let first = db.connect()?;
        configure(&first, busy_timeout)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        if !in_memory {
            // journal_mode is stored in the file, once is enough.
            pragma_query(&first, "PRAGMA journal_mode = WAL")
                .await
                .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        }

        let cohort_db = Self {
            db,
            busy_timeout,
            shared: in_memory.then(|| Mutex::new(first)),
        };
        cohort_db.run_migrations().await?;
        tracing::debug!(path, "opened cohort database");
        Ok(cohort_db)
    }

    /// Check out a connection for one operation or one transaction.
    ///
    /// Keep it for the whole of a transaction and drop it as soon as the
    /// statements are done.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a new connection cannot be opened.
    pub async fn connection(&self) -> Result<DbConnection<'_>, DatabaseError> {
        if let Some(shared) = &self.shared {
            return Ok(DbConnection::Shared(shared.lock().await));
        }
        let conn = self.db.connect()?;
        configure(&conn, self.busy_timeout).await?;
        Ok(DbConnection::Dedicated(conn))
    }

    /// How long a connection waits on another writer by default.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}
