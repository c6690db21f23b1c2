//! The workflow engine: the only code path that changes a study's `state`.

use std::time::{Duration, Instant};

use chrono::Utc;
use libsql::TransactionBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cohort_core::audit_detail::TransitionDetail;
use cohort_core::entities::Study;
use cohort_core::enums::{StudyState, Trigger};
use cohort_core::identity::Actor;
use cohort_core::notify::{NotificationContext, NotificationHook};
use cohort_core::workflow::Transition;

use crate::DbConnection;
use crate::error::{DatabaseError, WorkflowError};
use crate::repos::study::fetch_study;
use crate::repos::study_log;
use crate::service::CohortService;

/// What a committed transition hands to the notification phase.
struct Committed<'a> {
    study: Study,
    from: StudyState,
    actor: &'a Actor,
    transition: &'static Transition,
    submitter: Option<String>,
}

/// Load, check, write, and log, all on one open transaction.
async fn transition_in_tx<'a>(
    conn: &libsql::Connection,
    uuid: &Uuid,
    trigger: Trigger,
    actor: Option<&'a Actor>,
) -> Result<Committed<'a>, WorkflowError> {
    let mut study = match fetch_study(conn, uuid).await {
        Ok(study) => study,
        Err(DatabaseError::NoResult) => return Err(WorkflowError::StudyNotFound(*uuid)),
        Err(e) => return Err(e.into()),
    };

    let transition = Transition::lookup(study.state, trigger)?;
    let actor = transition.authorize(&study, actor)?;

    let from = study.state;
    let expected = study.version;
    let now = Utc::now();
    transition.apply(&mut study);

    let changed = conn
        .execute(
            "UPDATE studies SET state = ?1, public = ?2, version = version + 1, updated_at = ?3
             WHERE id = ?4 AND version = ?5",
            libsql::params![
                study.state.as_str(),
                i64::from(study.public),
                now.to_rfc3339(),
                study.id,
                expected
            ],
        )
        .await?;
    if changed == 0 {
        return Err(WorkflowError::Conflict {
            uuid: *uuid,
            expected,
        });
    }
    study.version = expected + 1;
    study.updated_at = now;

    let detail = TransitionDetail { from, trigger };
    study_log::record(conn, study.id, study.state, &actor.user_id, &detail, now).await?;

    let submitter = if transition.notifications().any(|hook| {
        matches!(
            hook,
            NotificationHook::SubmitterOfApproval | NotificationHook::SubmitterOfRejection
        )
    }) {
        study_log::latest_with_action(conn, study.id, StudyState::Pending)
            .await?
            .map(|log| log.user_id)
    } else {
        None
    };

    Ok(Committed {
        study,
        from,
        actor,
        transition,
        submitter,
    })
}

/// `SQLITE_BUSY`: another writer kept the database locked past our wait.
const SQLITE_BUSY: std::ffi::c_int = 5;

fn is_busy(error: &libsql::Error) -> bool {
    matches!(error, libsql::Error::SqliteFailure(code, _) if code & 0xff == SQLITE_BUSY)
}

/// Begin, run, and commit or roll back one transition before `deadline`.
///
/// Local libSQL calls do not yield, so the budget is enforced at the points
/// where time can actually pass: the wait for the write lock is capped to what
/// is left of it, and a body that overran it is rolled back before commit.
async fn run_bounded<'a>(
    conn: &DbConnection<'_>,
    uuid: &Uuid,
    trigger: Trigger,
    actor: Option<&'a Actor>,
    deadline: Instant,
    max_wait: Duration,
) -> Result<Committed<'a>, WorkflowError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    conn.limit_busy_wait(remaining.min(max_wait)).await?;

    let tx = match conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .await
    {
        Ok(tx) => tx,
        Err(e) if is_busy(&e) => return Err(WorkflowError::Timeout(*uuid)),
        Err(e) => return Err(e.into()),
    };

    let outcome = match transition_in_tx(&tx, uuid, trigger, actor).await {
        Ok(_) if Instant::now() >= deadline => Err(WorkflowError::Timeout(*uuid)),
        other => other,
    };

    match outcome {
        Ok(committed) => {
            tx.commit().await?;
            Ok(committed)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(study = %uuid, %trigger, error = %rollback, "rollback failed");
            }
            Err(error)
        }
    }
}

impl CohortService {
    /// Fire `trigger` on the study identified by `uuid` as `actor`.
    ///
    /// Validity, guard, state write, and log append run in one `IMMEDIATE`
    /// transaction. Waiting for the write lock and the work inside the
    /// transaction together must fit in the configured transaction timeout,
    /// otherwise everything is rolled back and `Timeout` is returned. Nothing
    /// is written unless all steps succeed. Notification hooks run after
    /// commit; their failures are logged and do not affect the result.
    ///
    /// # Errors
    ///
    /// - `WorkflowError::Rejected` for an illegal trigger, a missing actor, or
    ///   a failed guard.
    /// - `WorkflowError::StudyNotFound` for an unknown uuid.
    /// - `WorkflowError::Conflict`, `Timeout`, or `Persistence` when the
    ///   write could not be completed; re-fetch the study before retrying.
    pub async fn execute_transition(
        &self,
        uuid: &Uuid,
        trigger: Trigger,
        actor: Option<&Actor>,
    ) -> Result<Study, WorkflowError> {
        let budget = self.transaction_timeout();
        let deadline = Instant::now() + budget;

        let outcome = {
            let conn = self.db().connection().await?;
            // A dropped, unfinished transaction is rolled back by libSQL.
            tokio::time::timeout(
                budget,
                run_bounded(&conn, uuid, trigger, actor, deadline, self.db().busy_timeout()),
            )
            .await
            .unwrap_or(Err(WorkflowError::Timeout(*uuid)))
        };
        let committed = match outcome {
            Ok(committed) => committed,
            Err(error) => {
                debug!(study = %uuid, %trigger, %error, "transition refused");
                return Err(error);
            }
        };

        let Committed {
            study,
            from,
            actor,
            transition,
            submitter,
        } = committed;

        info!(
            study = %study.uuid,
            %trigger,
            %from,
            to = %study.state,
            user = %actor.user_id,
            "study transition committed"
        );

        let ctx = NotificationContext {
            study: &study,
            actor,
            transition,
            submitter: submitter.as_deref(),
        };
        for hook in transition.notifications() {
            if let Err(error) = hook.dispatch(self.hooks(), &ctx).await {
                warn!(
                    study = %study.uuid,
                    hook = hook.as_str(),
                    %error,
                    "notification failed; transition stands"
                );
            }
        }

        Ok(study)
    }

    /// Move a draft into moderation.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn submit(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Submit, actor).await
    }

    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn approve(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Approve, actor).await
    }

    /// Send a pending study back to draft.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn reject(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Reject, actor).await
    }

    /// Pull a pending or approved study back to draft for editing.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn retract(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Retract, actor).await
    }

    /// Go live. Also makes the study public.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn activate(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Activate, actor).await
    }

    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn pause(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Pause, actor).await
    }

    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn resume(&self, uuid: &Uuid, actor: Option<&Actor>) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Resume, actor).await
    }

    /// Retire a live or paused study for good. Also hides it.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_transition`].
    pub async fn deactivate(
        &self,
        uuid: &Uuid,
        actor: Option<&Actor>,
    ) -> Result<Study, WorkflowError> {
        self.execute_transition(uuid, Trigger::Deactivate, actor).await
    }

    /// Triggers `actor` could fire on the study right now.
    ///
    /// Read-only; the answer can be stale by the time a trigger is executed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the study does not exist.
    pub async fn permitted_triggers(
        &self,
        uuid: &Uuid,
        actor: &Actor,
    ) -> Result<Vec<Trigger>, DatabaseError> {
        let study = self.get_study(uuid).await?;
        Ok(study
            .state
            .available_triggers()
            .into_iter()
            .filter(|trigger| {
                Transition::lookup(study.state, *trigger)
                    .and_then(|t| t.authorize(&study, Some(actor)))
                    .is_ok()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cohort_core::enums::StudyPermission;
    use cohort_core::errors::TransitionError;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{create_test_study, force_state, owner_of, test_service};

    #[tokio::test]
    async fn submit_writes_state_version_and_log() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "engine").await;
        let owner = owner_of(&study);

        let pending = svc.submit(&study.uuid, Some(&owner)).await.unwrap();
        assert_eq!(pending.state, StudyState::Pending);
        assert_eq!(pending.version, study.version + 1);

        let stored = svc.get_study(&study.uuid).await.unwrap();
        assert_eq!(stored, pending);

        let history = svc.study_history(&study.uuid).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, StudyState::Pending);
        assert_eq!(history[0].user_id, owner.user_id);
        assert_eq!(
            history[0].detail,
            Some(TransitionDetail {
                from: StudyState::Draft,
                trigger: Trigger::Submit
            })
        );
    }

    #[test]
    fn busy_failures_are_recognised() {
        assert!(is_busy(&libsql::Error::SqliteFailure(5, "database is locked".into())));
        assert!(is_busy(&libsql::Error::SqliteFailure(517, "busy snapshot".into())));
        assert!(!is_busy(&libsql::Error::SqliteFailure(
            19,
            "constraint failed".into()
        )));
    }

    #[tokio::test]
    async fn zero_budget_rolls_back_and_times_out() {
        let svc = test_service()
            .await
            .with_transaction_timeout(Duration::ZERO);
        let study = create_test_study(&svc, "no time").await;

        let err = svc
            .submit(&study.uuid, Some(&owner_of(&study)))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Timeout(uuid) if uuid == study.uuid));

        let stored = svc.get_study(&study.uuid).await.unwrap();
        assert_eq!(stored.state, StudyState::Draft);
        assert!(svc.study_history(&study.uuid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn validity_is_checked_before_actor() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "ordering").await;

        let err = svc
            .execute_transition(&study.uuid, Trigger::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(
            err.transition_error(),
            Some(&TransitionError::InvalidTransition {
                state: StudyState::Draft,
                trigger: Trigger::Approve
            })
        );
    }

    #[tokio::test]
    async fn reject_and_retract_are_told_apart_in_history() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "back and forth").await;
        let owner = owner_of(&study);
        let admin = Actor::superuser("admin");

        svc.submit(&study.uuid, Some(&owner)).await.unwrap();
        svc.reject(&study.uuid, Some(&admin)).await.unwrap();
        svc.submit(&study.uuid, Some(&owner)).await.unwrap();
        svc.retract(&study.uuid, Some(&owner)).await.unwrap();

        let triggers: Vec<Trigger> = svc
            .study_history(&study.uuid)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|log| log.detail.map(|d| d.trigger))
            .collect();
        assert_eq!(
            triggers,
            vec![Trigger::Submit, Trigger::Reject, Trigger::Submit, Trigger::Retract]
        );
    }

    #[tokio::test]
    async fn permitted_triggers_respect_guard() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "menu").await;
        force_state(&svc, &study, StudyState::Approved, false).await;

        let owner = Actor::new("owner").grant(study.uuid, StudyPermission::Submit);
        let admin = Actor::new("admin").grant(study.uuid, StudyPermission::Administer);
        let stranger = Actor::new("stranger");

        assert_eq!(
            svc.permitted_triggers(&study.uuid, &owner).await.unwrap(),
            vec![Trigger::Retract]
        );
        let mut admin_triggers = svc.permitted_triggers(&study.uuid, &admin).await.unwrap();
        admin_triggers.sort_by_key(|t| t.as_str());
        assert_eq!(admin_triggers, vec![Trigger::Activate, Trigger::Retract]);
        assert!(
            svc.permitted_triggers(&study.uuid, &stranger)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
