//! Locating the Cohort project a command runs against.
//!
//! A project is any directory holding a `.cohort/` directory. `cohort init`
//! creates it; it keeps `config.toml` and, by default, `cohort.db`.

use std::path::{Path, PathBuf};

/// Per-project state directory.
pub const PROJECT_DIR: &str = ".cohort";

/// Nearest ancestor of `start` (itself included) that holds a `.cohort`
/// directory. A plain file of that name does not mark a project.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve `--project`, which may name the project or its `.cohort` directory.
pub fn explicit_project_root(path: &Path) -> anyhow::Result<PathBuf> {
    let root = if path.file_name().is_some_and(|name| name == PROJECT_DIR) {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    } else {
        path.to_path_buf()
    };

    if !root.is_dir() {
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            root.display()
        );
    }
    Ok(root)
}
