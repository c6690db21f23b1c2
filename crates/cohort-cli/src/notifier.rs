//! Notification hooks for the command line: every notification becomes a
//! structured log event on the `cohort::notify` target.
//!
//! Enable with `COHORT_LOG=cohort::notify=info`.

use async_trait::async_trait;
use cohort_core::entities::Study;
use cohort_core::errors::NotificationError;
use cohort_core::notify::{NotificationContext, NotificationHook, NotificationHooks};

pub struct LogNotifier;

fn emit(hook: NotificationHook, ctx: &NotificationContext<'_>) {
    tracing::info!(
        target: "cohort::notify",
        hook = hook.as_str(),
        study = %ctx.study.uuid,
        name = %ctx.study.name,
        state = %ctx.study.state,
        actor = ctx.actor.display_name(),
        submitter = ctx.submitter.unwrap_or("-"),
        "notification"
    );
}

#[async_trait]
impl NotificationHooks for LogNotifier {
    async fn on_study_created(&self, study: &Study) -> Result<(), NotificationError> {
        tracing::info!(
            target: "cohort::notify",
            study = %study.uuid,
            organization = %study.organization_id,
            "study created"
        );
        Ok(())
    }

    async fn notify_administrators_of_submission(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::AdministratorsOfSubmission, ctx);
        Ok(())
    }

    async fn notify_submitter_of_approval(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::SubmitterOfApproval, ctx);
        Ok(())
    }

    async fn notify_submitter_of_rejection(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::SubmitterOfRejection, ctx);
        Ok(())
    }

    async fn notify_administrators_of_retraction(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::AdministratorsOfRetraction, ctx);
        Ok(())
    }

    async fn notify_administrators_of_activation(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::AdministratorsOfActivation, ctx);
        Ok(())
    }

    async fn notify_administrators_of_pause(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::AdministratorsOfPause, ctx);
        Ok(())
    }

    async fn notify_administrators_of_deactivation(
        &self,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        emit(NotificationHook::AdministratorsOfDeactivation, ctx);
        Ok(())
    }
}
