use uuid::Uuid;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(uuid: &Uuid, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let study = ctx
        .service
        .get_study(uuid)
        .await
        .map_err(|error| match error {
            cohort_db::error::DatabaseError::NoResult => anyhow::anyhow!("study {uuid} not found"),
            other => other.into(),
        })?;
    output(&study, flags.format)
}
