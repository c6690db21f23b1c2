//! Study repository: create, lookups, listings, and descriptive edits.
//!
//! There is no method here that writes `state` or `public`. Those columns are
//! written only by the workflow engine in `crate::workflow`.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use cohort_core::entities::{NewStudy, Study};
use cohort_core::enums::StudyState;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_enum, parse_json, parse_uuid};
use crate::service::CohortService;
use crate::updates::study::StudyUpdate;

pub(crate) const STUDY_COLS: &str = "id, uuid, name, short_description, long_description, criteria, duration, contact_info, image, organization_id, blocks, state, public, version, created_at, updated_at";

pub(crate) fn row_to_study(row: &libsql::Row) -> Result<Study, DatabaseError> {
    Ok(Study {
        id: row.get(0)?,
        uuid: parse_uuid(&row.get::<String>(1)?)?,
        name: row.get(2)?,
        short_description: row.get(3)?,
        long_description: row.get(4)?,
        criteria: row.get(5)?,
        duration: row.get(6)?,
        contact_info: row.get(7)?,
        image: get_opt_string(row, 8)?,
        organization_id: row.get(9)?,
        blocks: parse_json(&row.get::<String>(10)?)?,
        state: parse_enum(&row.get::<String>(11)?)?,
        public: get_bool(row, 12)?,
        version: row.get(13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

/// Load one study by external id on an already-held connection or transaction.
pub(crate) async fn fetch_study(
    conn: &libsql::Connection,
    uuid: &Uuid,
) -> Result<Study, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {STUDY_COLS} FROM studies WHERE uuid = ?1"),
            [uuid.to_string()],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_study(&row)
}

fn require_name(name: &str) -> Result<(), DatabaseError> {
    if name.trim().is_empty() {
        return Err(DatabaseError::InvalidState(
            "study name must not be empty".into(),
        ));
    }
    Ok(())
}

async fn collect_studies(mut rows: libsql::Rows) -> Result<Vec<Study>, DatabaseError> {
    let mut studies = Vec::new();
    while let Some(row) = rows.next().await? {
        studies.push(row_to_study(&row)?);
    }
    Ok(studies)
}

impl CohortService {
    /// Insert a new study in `draft`, private, and fire `on_study_created`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for an empty name, or
    /// `DatabaseError` if the INSERT fails. Hook failures are logged only.
    pub async fn create_study(&self, new: &NewStudy) -> Result<Study, DatabaseError> {
        require_name(&new.name)?;

        let uuid = Uuid::new_v4();
        let now = Utc::now();

        let study = {
            let conn = self.db().connection().await?;
            conn.execute(
                "INSERT INTO studies (uuid, name, short_description, long_description, criteria, duration, contact_info, image, organization_id, blocks, state, public, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'draft', 0, 0, ?11, ?12)",
                libsql::params![
                    uuid.to_string(),
                    new.name.as_str(),
                    new.short_description.as_str(),
                    new.long_description.as_str(),
                    new.criteria.as_str(),
                    new.duration.as_str(),
                    new.contact_info.as_str(),
                    new.image.as_deref(),
                    new.organization_id.as_str(),
                    new.blocks.to_string(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

            Study {
                id: conn.last_insert_rowid(),
                uuid,
                name: new.name.clone(),
                short_description: new.short_description.clone(),
                long_description: new.long_description.clone(),
                criteria: new.criteria.clone(),
                duration: new.duration.clone(),
                contact_info: new.contact_info.clone(),
                image: new.image.clone(),
                organization_id: new.organization_id.clone(),
                blocks: new.blocks.clone(),
                state: StudyState::Draft,
                public: false,
                version: 0,
                created_at: now,
                updated_at: now,
            }
        };

        info!(study = %study.uuid, name = %study.name, "study created");

        if let Err(error) = self.hooks().on_study_created(&study).await {
            warn!(study = %study.uuid, %error, "on_study_created hook failed");
        }

        Ok(study)
    }

    /// Fetch a study by its external uuid.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no study has this uuid.
    pub async fn get_study(&self, uuid: &Uuid) -> Result<Study, DatabaseError> {
        let conn = self.db().connection().await?;
        fetch_study(&conn, uuid).await
    }

    /// Studies visible to participants: `active` and `public`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_public_studies(&self, limit: u32) -> Result<Vec<Study>, DatabaseError> {
        let conn = self.db().connection().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {STUDY_COLS} FROM studies
                     WHERE state = 'active' AND public = 1
                     ORDER BY created_at DESC, id DESC LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        collect_studies(rows).await
    }

    /// Studies in one lifecycle state, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_studies_by_state(
        &self,
        state: StudyState,
        limit: u32,
    ) -> Result<Vec<Study>, DatabaseError> {
        let conn = self.db().connection().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {STUDY_COLS} FROM studies WHERE state = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2"
                ),
                libsql::params![state.as_str(), i64::from(limit)],
            )
            .await?;
        collect_studies(rows).await
    }

    /// All studies regardless of state, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_studies(&self, limit: u32) -> Result<Vec<Study>, DatabaseError> {
        let conn = self.db().connection().await?;
        let rows = conn
            .query(
                &format!("SELECT {STUDY_COLS} FROM studies ORDER BY created_at DESC, id DESC LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;
        collect_studies(rows).await
    }

    /// Edit descriptive fields of a study that is still in `draft`.
    ///
    /// Submitted, approved, and live studies are locked; retract first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` for an unknown uuid and
    /// `DatabaseError::InvalidState` for a blank name, or when the study is not
    /// in `draft` or was modified concurrently.
    pub async fn update_study_details(
        &self,
        uuid: &Uuid,
        update: StudyUpdate,
    ) -> Result<Study, DatabaseError> {
        if let Some(name) = &update.name {
            require_name(name)?;
        }

        let conn = self.db().connection().await?;
        let current = fetch_study(&conn, uuid).await?;

        if current.state != StudyState::Draft {
            return Err(DatabaseError::InvalidState(format!(
                "study {uuid} is {} and can only be edited in draft",
                current.state
            )));
        }
        if update.is_empty() {
            return Ok(current);
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        let text_fields = [
            ("name", &update.name),
            ("short_description", &update.short_description),
            ("long_description", &update.long_description),
            ("criteria", &update.criteria),
            ("duration", &update.duration),
            ("contact_info", &update.contact_info),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                params.push(value.as_str().into());
                sets.push(format!("{column} = ?{}", params.len()));
            }
        }
        if let Some(ref image) = update.image {
            params.push(image.as_deref().into());
            sets.push(format!("image = ?{}", params.len()));
        }
        if let Some(ref blocks) = update.blocks {
            params.push(blocks.to_string().into());
            sets.push(format!("blocks = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        sets.push(String::from("version = version + 1"));

        params.push(current.id.into());
        let id_idx = params.len();
        params.push(current.version.into());
        let version_idx = params.len();

        let sql = format!(
            "UPDATE studies SET {} WHERE id = ?{id_idx} AND version = ?{version_idx} AND state = 'draft'",
            sets.join(", ")
        );
        let changed = conn
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "study {uuid} was modified concurrently"
            )));
        }

        fetch_study(&conn, uuid).await
    }

    /// Persist the descriptive fields of `study`.
    ///
    /// `state` and `public` on the passed value are ignored; the stored ones
    /// stay as they are. Same draft-only rule as [`Self::update_study_details`].
    ///
    /// # Errors
    ///
    /// See [`Self::update_study_details`].
    pub async fn save_study(&self, study: &Study) -> Result<Study, DatabaseError> {
        let update = StudyUpdate {
            name: Some(study.name.clone()),
            short_description: Some(study.short_description.clone()),
            long_description: Some(study.long_description.clone()),
            criteria: Some(study.criteria.clone()),
            duration: Some(study.duration.clone()),
            contact_info: Some(study.contact_info.clone()),
            image: Some(study.image.clone()),
            blocks: Some(study.blocks.clone()),
        };
        self.update_study_details(&study.uuid, update).await
    }
}
