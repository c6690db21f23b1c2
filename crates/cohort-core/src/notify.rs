//! Notification hooks fired by study transitions.
//!
//! [`NotificationHooks`] is the capability set the surrounding application
//! implements to deliver mail, chat messages, and so on. Every method has a
//! no-op default, so an implementor only overrides what it delivers. Failures
//! are returned, never panicked; the engine logs them as warnings and the
//! transition stands.

use std::fmt;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Study;
use crate::errors::NotificationError;
use crate::identity::Actor;
use crate::workflow::Transition;

/// Names of the hooks a transition can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationHook {
    AdministratorsOfSubmission,
    SubmitterOfApproval,
    SubmitterOfRejection,
    AdministratorsOfRetraction,
    AdministratorsOfActivation,
    AdministratorsOfPause,
    AdministratorsOfDeactivation,
}

impl NotificationHook {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdministratorsOfSubmission => "notify_administrators_of_submission",
            Self::SubmitterOfApproval => "notify_submitter_of_approval",
            Self::SubmitterOfRejection => "notify_submitter_of_rejection",
            Self::AdministratorsOfRetraction => "notify_administrators_of_retraction",
            Self::AdministratorsOfActivation => "notify_administrators_of_activation",
            Self::AdministratorsOfPause => "notify_administrators_of_pause",
            Self::AdministratorsOfDeactivation => "notify_administrators_of_deactivation",
        }
    }

    /// Route this hook to the matching method on `hooks`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the hook implementation returns.
    pub async fn dispatch(
        self,
        hooks: &dyn NotificationHooks,
        ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        match self {
            Self::AdministratorsOfSubmission => {
                hooks.notify_administrators_of_submission(ctx).await
            }
            Self::SubmitterOfApproval => hooks.notify_submitter_of_approval(ctx).await,
            Self::SubmitterOfRejection => hooks.notify_submitter_of_rejection(ctx).await,
            Self::AdministratorsOfRetraction => {
                hooks.notify_administrators_of_retraction(ctx).await
            }
            Self::AdministratorsOfActivation => {
                hooks.notify_administrators_of_activation(ctx).await
            }
            Self::AdministratorsOfPause => hooks.notify_administrators_of_pause(ctx).await,
            Self::AdministratorsOfDeactivation => {
                hooks.notify_administrators_of_deactivation(ctx).await
            }
        }
    }
}

impl fmt::Display for NotificationHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a hook gets to see about the transition that fired it.
#[derive(Debug, Clone, Copy)]
pub struct NotificationContext<'a> {
    /// The study as committed, already in its new state.
    pub study: &'a Study,
    pub actor: &'a Actor,
    pub transition: &'a Transition,
    /// User id of whoever last submitted the study, if known.
    pub submitter: Option<&'a str>,
}

#[async_trait]
pub trait NotificationHooks: Send + Sync {
    /// Called once after a study row is first inserted.
    async fn on_study_created(&self, _study: &Study) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_administrators_of_submission(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_submitter_of_approval(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_submitter_of_rejection(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_administrators_of_retraction(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_administrators_of_activation(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_administrators_of_pause(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn notify_administrators_of_deactivation(
        &self,
        _ctx: &NotificationContext<'_>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Hooks that deliver nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationHooks for NoopNotifier {}
