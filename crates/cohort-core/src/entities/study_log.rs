use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit_detail::TransitionDetail;
use crate::enums::StudyState;

/// An append-only record of one executed transition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudyLog {
    pub id: i64,
    pub study_id: i64,
    /// Destination state of the transition.
    pub action: StudyState,
    pub user_id: String,
    pub detail: Option<TransitionDetail>,
    pub created_at: DateTime<Utc>,
}
