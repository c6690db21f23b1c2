use clap::{Args, Subcommand};
use cohort_core::enums::StudyState;
use uuid::Uuid;

use crate::cli::subcommands::StudyCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create `.cohort/` and the database in the current directory.
    Init(InitArgs),
    /// Studies and their lifecycle.
    Study {
        #[command(subcommand)]
        action: StudyCommands,
    },
    /// Query the transition log across studies.
    Log(LogArgs),
    /// Print the JSON Schema of an entity type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Database file to create instead of the configured one.
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct LogArgs {
    /// Only entries for this study.
    #[arg(long)]
    pub study: Option<Uuid>,
    /// Only entries whose destination state is this.
    #[arg(long)]
    pub action: Option<StudyState>,
    /// Only entries by this user id.
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: study, new-study, study-log
    pub type_name: String,
}
