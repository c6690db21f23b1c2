use uuid::Uuid;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(uuid: &Uuid, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = ctx.service.study_history(uuid).await?;
    output(&entries, flags.format)
}
