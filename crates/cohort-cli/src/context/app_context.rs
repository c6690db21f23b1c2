use std::sync::Arc;

use anyhow::Context;
use cohort_config::CohortConfig;
use cohort_db::service::CohortService;

use crate::notifier::LogNotifier;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CohortService,
    pub config: CohortConfig,
}

impl AppContext {
    /// Open the configured database with log-backed notification hooks.
    pub async fn init(config: CohortConfig) -> anyhow::Result<Self> {
        let service = CohortService::from_config(&config)
            .await
            .with_context(|| format!("failed to open cohort database at {}", config.database.path))?
            .with_hooks(Arc::new(LogNotifier));

        Ok(Self { service, config })
    }
}
