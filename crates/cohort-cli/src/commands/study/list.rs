use cohort_core::enums::StudyState;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    state: Option<StudyState>,
    public: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
    let studies = match (public, state) {
        (true, _) => ctx.service.list_public_studies(limit).await?,
        (false, Some(state)) => ctx.service.list_studies_by_state(state, limit).await?,
        (false, None) => ctx.service.list_studies(limit).await?,
    };
    output(&studies, flags.format)
}
