use std::path::PathBuf;

use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Aligned columns; study states are colored on a terminal.
    Table,
    /// Single-line JSON, for piping.
    Raw,
}

/// Flags every handler sees, whichever side of the subcommand they came on.
#[derive(Clone, Debug, Default)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    pub project: Option<PathBuf>,
}

impl GlobalFlags {
    /// Log filter used when `COHORT_LOG` is unset. `--quiet` beats `--verbose`.
    #[must_use]
    pub const fn log_directive(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
