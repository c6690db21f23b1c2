use cohort_core::enums::Trigger;
use cohort_db::error::WorkflowError;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TransitionArgs;
use crate::commands::shared::actor::resolve_actor;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    trigger: Trigger,
    args: &TransitionArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = resolve_actor(&args.actor, args.uuid);
    let study = ctx
        .service
        .execute_transition(&args.uuid, trigger, actor.as_ref())
        .await
        .map_err(explain)?;
    output(&study, flags.format)
}

/// Refusals read as refusals; storage failures tell the caller to re-check.
fn explain(error: WorkflowError) -> anyhow::Error {
    if error.is_rejection() {
        anyhow::anyhow!("refused: {error}")
    } else {
        anyhow::anyhow!("{error}; the study may or may not have changed, fetch it before retrying")
    }
}
