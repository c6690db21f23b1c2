//! Shared test utilities for cohort-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::time::Duration;

    use cohort_core::entities::{NewStudy, Study};
    use cohort_core::enums::StudyState;
    use cohort_core::identity::Actor;

    use crate::CohortDb;
    use crate::service::CohortService;

    /// Create an in-memory CohortService with no-op hooks.
    pub async fn test_service() -> CohortService {
        let db = CohortDb::open_local(":memory:", Duration::from_secs(1))
            .await
            .unwrap();
        CohortService::from_db(db)
    }

    /// Create a draft study with a fixed organization.
    pub async fn create_test_study(svc: &CohortService, name: &str) -> Study {
        svc.create_study(&NewStudy::new(name, "org-test"))
            .await
            .unwrap()
    }

    /// An actor holding the owner's grants (view, edit, submit, respond) on `study`.
    pub fn owner_of(study: &Study) -> Actor {
        use cohort_core::enums::StudyPermission;

        [
            StudyPermission::View,
            StudyPermission::Edit,
            StudyPermission::Submit,
            StudyPermission::Respond,
        ]
        .into_iter()
        .fold(Actor::new("owner"), |actor, perm| actor.grant(study.uuid, perm))
    }

    /// Put a study into `state` with raw SQL, skipping the engine and the log.
    /// Only for arranging fixtures.
    pub async fn force_state(svc: &CohortService, study: &Study, state: StudyState, public: bool) {
        let conn = svc.db().connection().await.unwrap();
        conn.execute(
            "UPDATE studies SET state = ?1, public = ?2 WHERE id = ?3",
            libsql::params![state.as_str(), i64::from(public), study.id],
        )
        .await
        .unwrap();
    }
}
