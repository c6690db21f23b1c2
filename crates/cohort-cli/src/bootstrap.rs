use std::path::PathBuf;

use anyhow::Context;
use cohort_config::CohortConfig;

use crate::cli::GlobalFlags;
use crate::context::{explicit_project_root, find_project_root};

/// Make the project root the working directory so relative config and
/// database paths resolve against it.
///
/// `--project` wins; otherwise walk up from the current directory looking for
/// `.cohort`. Outside any project the working directory is left alone.
pub fn enter_project(flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match &flags.project {
        Some(project) => Some(explicit_project_root(project)?),
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            find_project_root(&cwd)
        }
    };

    if let Some(root) = root {
        std::env::set_current_dir(&root)
            .with_context(|| format!("failed to enter project {}", root.display()))?;
        tracing::debug!(root = %root.display(), "using project root");
    }
    Ok(())
}

/// Load `.env` from the project root if present, then layered config.
pub fn load_config() -> anyhow::Result<CohortConfig> {
    let env_path = PathBuf::from(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    CohortConfig::load().context("failed to load cohort configuration")
}
