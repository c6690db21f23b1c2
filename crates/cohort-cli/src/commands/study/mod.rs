mod create;
mod edit;
mod get;
mod history;
mod list;
mod transition;
mod triggers;

use cohort_core::enums::Trigger;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudyCommands;
use crate::context::AppContext;

/// Handle `cohort study`.
pub async fn handle(action: &StudyCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        StudyCommands::Create {
            name,
            organization,
            fields,
        } => create::run(name, organization, fields, ctx, flags).await,
        StudyCommands::Edit {
            uuid,
            name,
            fields,
            clear_image,
        } => edit::run(uuid, name.as_deref(), fields, *clear_image, ctx, flags).await,
        StudyCommands::Get { uuid } => get::run(uuid, ctx, flags).await,
        StudyCommands::List { state, public } => list::run(*state, *public, ctx, flags).await,
        StudyCommands::History { uuid } => history::run(uuid, ctx, flags).await,
        StudyCommands::Triggers { uuid, actor } => triggers::run(uuid, actor, ctx, flags).await,
        StudyCommands::Submit(args) => transition::run(Trigger::Submit, args, ctx, flags).await,
        StudyCommands::Approve(args) => transition::run(Trigger::Approve, args, ctx, flags).await,
        StudyCommands::Reject(args) => transition::run(Trigger::Reject, args, ctx, flags).await,
        StudyCommands::Retract(args) => transition::run(Trigger::Retract, args, ctx, flags).await,
        StudyCommands::Activate(args) => transition::run(Trigger::Activate, args, ctx, flags).await,
        StudyCommands::Pause(args) => transition::run(Trigger::Pause, args, ctx, flags).await,
        StudyCommands::Resume(args) => transition::run(Trigger::Resume, args, ctx, flags).await,
        StudyCommands::Deactivate(args) => {
            transition::run(Trigger::Deactivate, args, ctx, flags).await
        }
    }
}
