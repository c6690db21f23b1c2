//! Database and workflow error types for cohort-db.

use cohort_core::errors::TransitionError;
use thiserror::Error;
use uuid::Uuid;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB, edit of a locked study).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from `CohortService::execute_transition`.
///
/// `Rejected` and `StudyNotFound` happen before anything is written. The
/// remaining variants abort the transaction; callers should re-fetch the
/// study before deciding what to do next.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The trigger was refused by the transition table or its guard.
    #[error(transparent)]
    Rejected(#[from] TransitionError),

    #[error("Study not found: {0}")]
    StudyNotFound(Uuid),

    /// The study row changed under us between read and write.
    #[error("Study {uuid} was modified concurrently (expected version {expected})")]
    Conflict { uuid: Uuid, expected: i64 },

    /// The guarded region outlived the configured transaction timeout.
    #[error("Transition on study {0} timed out and was rolled back")]
    Timeout(Uuid),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] DatabaseError),
}

impl WorkflowError {
    /// Whether this should be shown as an explicit refusal rather than a
    /// generic retryable failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::StudyNotFound(_))
    }

    /// The refusal reason, if this is one.
    #[must_use]
    pub const fn transition_error(&self) -> Option<&TransitionError> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<libsql::Error> for WorkflowError {
    fn from(e: libsql::Error) -> Self {
        Self::Persistence(DatabaseError::LibSql(e))
    }
}

#[cfg(test)]
mod tests {
    use cohort_core::enums::{StudyState, Trigger};

    use super::*;

    #[test]
    fn rejections_are_distinguished_from_failures() {
        let invalid = WorkflowError::from(TransitionError::InvalidTransition {
            state: StudyState::Draft,
            trigger: Trigger::Approve,
        });
        assert!(invalid.is_rejection());
        assert!(invalid.transition_error().is_some());

        let persistence = WorkflowError::from(DatabaseError::NoResult);
        assert!(!persistence.is_rejection());
        assert!(persistence.transition_error().is_none());

        assert!(!WorkflowError::Timeout(Uuid::nil()).is_rejection());
    }

    #[test]
    fn rejected_message_is_transparent() {
        let err = WorkflowError::from(TransitionError::ActorRequired {
            trigger: Trigger::Submit,
        });
        assert_eq!(
            err.to_string(),
            "An acting user is required to submit a study"
        );
    }
}
