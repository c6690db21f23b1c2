use cohort_core::entities::{NewStudy, Study, StudyLog};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `cohort schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.replace('_', "-").as_str() {
        "study" => schemars::schema_for!(Study),
        "new-study" => schemars::schema_for!(NewStudy),
        "study-log" => schemars::schema_for!(StudyLog),
        other => anyhow::bail!("unknown type '{other}' (expected study, new-study, or study-log)"),
    };
    output(&schema, flags.format)
}
