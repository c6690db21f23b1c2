//! Service layer orchestrating study persistence and the workflow engine.
//!
//! `CohortService` wraps `CohortDb` (raw database access) and the
//! notification hooks supplied by the surrounding application. All repo
//! methods are implemented as `impl CohortService` blocks.

use std::sync::Arc;
use std::time::Duration;

use cohort_config::CohortConfig;
use cohort_core::notify::{NoopNotifier, NotificationHooks};

use crate::CohortDb;
use crate::error::DatabaseError;

const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates study mutations, the transition log, and notifications.
///
/// Every transition follows this protocol:
/// 1. Begin an `IMMEDIATE` transaction
/// 2. Load the study, resolve the edge, run the guard
/// 3. Write the new state (version-checked)
/// 4. Append the log row
/// 5. Commit
/// 6. Fire notification hooks (best-effort)
pub struct CohortService {
    db: CohortDb,
    hooks: Arc<dyn NotificationHooks>,
    transaction_timeout: Duration,
}

impl CohortService {
    /// Create a new service wrapping a local database, with no-op hooks.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = CohortDb::open_local(db_path, DEFAULT_BUSY_TIMEOUT).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service from loaded configuration.
    ///
    /// Creates the database's parent directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory or database cannot be created.
    pub async fn from_config(config: &CohortConfig) -> Result<Self, DatabaseError> {
        if let Some(dir) = config.database.parent_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                DatabaseError::Other(anyhow::anyhow!(
                    "failed to create database directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
        let db = CohortDb::open_local(&config.database.path, config.database.busy_timeout()).await?;
        Ok(Self::from_db(db).with_transaction_timeout(config.workflow.transaction_timeout()))
    }

    /// Create from an existing `CohortDb` (for testing).
    #[must_use]
    pub fn from_db(db: CohortDb) -> Self {
        Self {
            db,
            hooks: Arc::new(NoopNotifier),
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Replace the notification hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn NotificationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CohortDb {
        &self.db
    }

    /// Access the notification hooks.
    #[must_use]
    pub fn hooks(&self) -> &dyn NotificationHooks {
        self.hooks.as_ref()
    }

    #[must_use]
    pub const fn transaction_timeout(&self) -> Duration {
        self.transaction_timeout
    }
}
