use anyhow::Context;
use cohort_config::CohortConfig;
use cohort_db::service::CohortService;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::PROJECT_DIR;
use crate::output::output;

/// Handle `cohort init`.
pub async fn handle(args: &InitArgs, config: &CohortConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    std::fs::create_dir_all(PROJECT_DIR)
        .with_context(|| format!("failed to create {PROJECT_DIR} directory"))?;

    let mut config = config.clone();
    if let Some(database) = &args.database {
        config.database.path.clone_from(database);
    }

    CohortService::from_config(&config)
        .await
        .with_context(|| format!("failed to initialize database at {}", config.database.path))?;

    let root = std::env::current_dir().context("failed to read current directory")?;
    output(
        &json!({
            "root": root.display().to_string(),
            "database": config.database.path,
        }),
        flags.format,
    )
}
