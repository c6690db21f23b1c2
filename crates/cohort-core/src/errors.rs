//! Cross-cutting error types for Cohort.
//!
//! `TransitionError` covers every way the workflow can refuse a trigger before
//! anything is mutated. `NotificationError` is non-fatal: the engine logs it
//! and moves on. Storage errors are defined in `cohort-db`.

use thiserror::Error;
use uuid::Uuid;

use crate::enums::{StudyState, Trigger};
use crate::notify::NotificationHook;

/// A core value could not be parsed or validated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown state, trigger, or permission name.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A trigger was refused. Nothing was mutated and nothing was logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The trigger has no edge out of the study's current state.
    #[error("Invalid transition: '{trigger}' is not allowed from state '{state}'")]
    InvalidTransition { state: StudyState, trigger: Trigger },

    /// The guard rejected the acting user.
    #[error("Permission denied: user '{user_id}' may not {trigger} study {study}")]
    PermissionDenied {
        user_id: String,
        trigger: Trigger,
        study: Uuid,
    },

    /// Permission guards cannot run without an acting user.
    #[error("An acting user is required to {trigger} a study")]
    ActorRequired { trigger: Trigger },
}

/// A notification hook failed. Never fatal to the transition that fired it.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The delivery backend reported a failure.
    #[error("Notification '{hook}' failed: {message}")]
    Delivery {
        hook: NotificationHook,
        message: String,
    },

    /// Anything a hook implementation propagates with `?`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
