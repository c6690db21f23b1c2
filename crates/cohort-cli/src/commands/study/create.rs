use cohort_core::entities::NewStudy;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudyFields;
use crate::commands::shared::parse::parse_json;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    organization: &str,
    fields: &StudyFields,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut new = NewStudy::new(name, organization);
    new.short_description = fields.short_description.clone().unwrap_or_default();
    new.long_description = fields.long_description.clone().unwrap_or_default();
    new.criteria = fields.criteria.clone().unwrap_or_default();
    new.duration = fields.duration.clone().unwrap_or_default();
    new.contact_info = fields.contact_info.clone().unwrap_or_default();
    new.image.clone_from(&fields.image);
    if let Some(raw) = &fields.blocks {
        new.blocks = parse_json(raw, "blocks")?;
    }

    let study = ctx.service.create_study(&new).await?;
    output(&study, flags.format)
}
