use serde_json::json;
use uuid::Uuid;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ActorArgs;
use crate::commands::shared::actor::resolve_actor;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    uuid: &Uuid,
    actor: &ActorArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let Some(actor) = resolve_actor(actor, *uuid) else {
        anyhow::bail!("--user is required to list permitted triggers");
    };
    let triggers = ctx.service.permitted_triggers(uuid, &actor).await?;
    output(
        &json!({
            "study": uuid,
            "user": actor.user_id,
            "triggers": triggers,
        }),
        flags.format,
    )
}
