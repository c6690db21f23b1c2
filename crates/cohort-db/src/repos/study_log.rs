//! Study log repository.
//!
//! One row per executed transition. Rows are inserted only by the workflow
//! engine, inside its transaction; the schema's triggers refuse UPDATE and
//! DELETE. Everything public here is read-only.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cohort_core::audit_detail::TransitionDetail;
use cohort_core::entities::StudyLog;
use cohort_core::enums::StudyState;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::CohortService;

const LOG_COLS: &str = "l.id, l.study_id, l.action, l.user_id, l.detail, l.created_at";

/// Filter criteria for log queries.
#[derive(Debug, Default)]
pub struct StudyLogFilter {
    pub study: Option<Uuid>,
    pub action: Option<StudyState>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_log(row: &libsql::Row) -> Result<StudyLog, DatabaseError> {
    Ok(StudyLog {
        id: row.get(0)?,
        study_id: row.get(1)?,
        action: parse_enum(&row.get::<String>(2)?)?,
        user_id: row.get(3)?,
        detail: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Append one log row. Only the engine calls this, on its open transaction.
pub(crate) async fn record(
    conn: &libsql::Connection,
    study_id: i64,
    action: StudyState,
    user_id: &str,
    detail: &TransitionDetail,
    at: DateTime<Utc>,
) -> Result<StudyLog, DatabaseError> {
    let detail_json = serde_json::to_string(detail)
        .map_err(|e| DatabaseError::Query(format!("Failed to encode log detail: {e}")))?;
    conn.execute(
        "INSERT INTO study_logs (study_id, action, user_id, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            study_id,
            action.as_str(),
            user_id,
            detail_json,
            at.to_rfc3339()
        ],
    )
    .await?;

    Ok(StudyLog {
        id: conn.last_insert_rowid(),
        study_id,
        action,
        user_id: user_id.to_string(),
        detail: Some(*detail),
        created_at: at,
    })
}

/// Most recent log row for `study_id` whose destination was `action`.
pub(crate) async fn latest_with_action(
    conn: &libsql::Connection,
    study_id: i64,
    action: StudyState,
) -> Result<Option<StudyLog>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {LOG_COLS} FROM study_logs l
                 WHERE l.study_id = ?1 AND l.action = ?2
                 ORDER BY l.id DESC LIMIT 1"
            ),
            libsql::params![study_id, action.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_log(&row)?)),
        None => Ok(None),
    }
}

impl CohortService {
    /// Full transition history of one study, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the study does not exist.
    pub async fn study_history(&self, uuid: &Uuid) -> Result<Vec<StudyLog>, DatabaseError> {
        let conn = self.db().connection().await?;
        let study = crate::repos::study::fetch_study(&conn, uuid).await?;

        let mut rows = conn
            .query(
                &format!("SELECT {LOG_COLS} FROM study_logs l WHERE l.study_id = ?1 ORDER BY l.id ASC"),
                [study.id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_log(&row)?);
        }
        Ok(entries)
    }

    /// The most recent log row for a study with the given destination state.
    ///
    /// `latest_log_with_action(uuid, StudyState::Pending)` is the last submit.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the study does not exist.
    pub async fn latest_log_with_action(
        &self,
        uuid: &Uuid,
        action: StudyState,
    ) -> Result<Option<StudyLog>, DatabaseError> {
        let conn = self.db().connection().await?;
        let study = crate::repos::study::fetch_study(&conn, uuid).await?;
        latest_with_action(&conn, study.id, action).await
    }

    /// Query log rows across studies with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_study_logs(
        &self,
        filter: &StudyLogFilter,
    ) -> Result<Vec<StudyLog>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref study) = filter.study {
            params.push(libsql::Value::Text(study.to_string()));
            conditions.push(format!("s.uuid = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("l.action = ?{}", params.len()));
        }
        if let Some(ref user_id) = filter.user_id {
            params.push(libsql::Value::Text(user_id.clone()));
            conditions.push(format!("l.user_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {LOG_COLS} FROM study_logs l
             JOIN studies s ON s.id = l.study_id
             {where_clause}
             ORDER BY l.id DESC LIMIT {limit}"
        );

        let conn = self.db().connection().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_log(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use cohort_core::enums::Trigger;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{create_test_study, test_service};

    async fn append(svc: &CohortService, study_id: i64, action: StudyState, user: &str, detail: TransitionDetail) {
        let conn = svc.db().connection().await.unwrap();
        record(&conn, study_id, action, user, &detail, Utc::now())
            .await
            .unwrap();
    }

    fn detail(from: StudyState, trigger: Trigger) -> TransitionDetail {
        TransitionDetail { from, trigger }
    }

    #[tokio::test]
    async fn history_is_oldest_first_with_detail() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "logged").await;

        append(&svc, study.id, StudyState::Pending, "alice", detail(StudyState::Draft, Trigger::Submit)).await;
        append(&svc, study.id, StudyState::Draft, "admin", detail(StudyState::Pending, Trigger::Reject)).await;

        let history = svc.study_history(&study.uuid).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, StudyState::Pending);
        assert_eq!(history[0].user_id, "alice");
        assert_eq!(history[1].action, StudyState::Draft);
        assert_eq!(
            history[1].detail,
            Some(detail(StudyState::Pending, Trigger::Reject))
        );
    }

    #[tokio::test]
    async fn history_of_unknown_study_is_no_result() {
        let svc = test_service().await;
        let result = svc.study_history(&Uuid::new_v4()).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn latest_with_action_picks_most_recent() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "resubmitted").await;

        append(&svc, study.id, StudyState::Pending, "alice", detail(StudyState::Draft, Trigger::Submit)).await;
        append(&svc, study.id, StudyState::Draft, "alice", detail(StudyState::Pending, Trigger::Retract)).await;
        append(&svc, study.id, StudyState::Pending, "bob", detail(StudyState::Draft, Trigger::Submit)).await;

        let latest = svc
            .latest_log_with_action(&study.uuid, StudyState::Pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.user_id, "bob");

        let none = svc
            .latest_log_with_action(&study.uuid, StudyState::Active)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn query_filters_by_study_and_user() {
        let svc = test_service().await;
        let first = create_test_study(&svc, "first").await;
        let second = create_test_study(&svc, "second").await;

        append(&svc, first.id, StudyState::Pending, "alice", detail(StudyState::Draft, Trigger::Submit)).await;
        append(&svc, second.id, StudyState::Pending, "bob", detail(StudyState::Draft, Trigger::Submit)).await;
        append(&svc, second.id, StudyState::Approved, "admin", detail(StudyState::Pending, Trigger::Approve)).await;

        let for_second = svc
            .query_study_logs(&StudyLogFilter {
                study: Some(second.uuid),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_second.len(), 2);
        assert_eq!(for_second[0].action, StudyState::Approved);

        let by_alice = svc
            .query_study_logs(&StudyLogFilter {
                user_id: Some("alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_alice.len(), 1);
        assert_eq!(by_alice[0].study_id, first.id);

        let pending = svc
            .query_study_logs(&StudyLogFilter {
                action: Some(StudyState::Pending),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
    }
}
