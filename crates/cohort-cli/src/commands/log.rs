use cohort_db::repos::study_log::StudyLogFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LogArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cohort log`.
pub async fn handle(args: &LogArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = StudyLogFilter {
        study: args.study,
        action: args.action,
        user_id: args.user.clone(),
        limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
    };
    let entries = ctx.service.query_study_logs(&filter).await?;
    output(&entries, flags.format)
}
