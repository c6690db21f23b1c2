use cohort_db::updates::study::{StudyUpdate, StudyUpdateBuilder};
use uuid::Uuid;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudyFields;
use crate::commands::shared::parse::parse_json;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    uuid: &Uuid,
    name: Option<&str>,
    fields: &StudyFields,
    clear_image: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(name, fields, clear_image)?;
    if update.is_empty() {
        anyhow::bail!("nothing to edit: pass at least one field");
    }
    let study = ctx.service.update_study_details(uuid, update).await?;
    output(&study, flags.format)
}

fn build_update(
    name: Option<&str>,
    fields: &StudyFields,
    clear_image: bool,
) -> anyhow::Result<StudyUpdate> {
    let mut builder = StudyUpdateBuilder::new();
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(text) = &fields.short_description {
        builder = builder.short_description(text);
    }
    if let Some(text) = &fields.long_description {
        builder = builder.long_description(text);
    }
    if let Some(criteria) = &fields.criteria {
        builder = builder.criteria(criteria);
    }
    if let Some(duration) = &fields.duration {
        builder = builder.duration(duration);
    }
    if let Some(contact) = &fields.contact_info {
        builder = builder.contact_info(contact);
    }
    if clear_image {
        builder = builder.image(None);
    } else if let Some(image) = &fields.image {
        builder = builder.image(Some(image.clone()));
    }
    if let Some(raw) = &fields.blocks {
        builder = builder.blocks(parse_json(raw, "blocks")?);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::build_update;
    use crate::cli::subcommands::StudyFields;

    #[test]
    fn only_passed_fields_are_set() {
        let fields = StudyFields {
            criteria: Some("18+".into()),
            ..StudyFields::default()
        };
        let update = build_update(Some("renamed"), &fields, false).expect("update");
        assert_eq!(update.name.as_deref(), Some("renamed"));
        assert_eq!(update.criteria.as_deref(), Some("18+"));
        assert!(update.duration.is_none());
        assert!(update.image.is_none());
    }

    #[test]
    fn clear_image_sets_explicit_none() {
        let update = build_update(None, &StudyFields::default(), true).expect("update");
        assert_eq!(update.image, Some(None));
    }

    #[test]
    fn no_flags_is_empty() {
        let update = build_update(None, &StudyFields::default(), false).expect("update");
        assert!(update.is_empty());
    }
}
