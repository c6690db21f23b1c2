use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::StudyState;

/// A research study moving through the moderated lifecycle.
///
/// `state` and `public` are readable here but only the workflow engine writes
/// them to storage. Saving a `Study` through the repository persists its
/// descriptive fields and ignores both, so a field assignment can never skip
/// a guard or an audit row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Study {
    /// Storage key. Never exposed in URLs.
    pub id: i64,
    /// Stable external identifier.
    pub uuid: Uuid,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub criteria: String,
    pub duration: String,
    pub contact_info: String,
    pub image: Option<String>,
    pub organization_id: String,
    /// Study content. Opaque to the workflow.
    pub blocks: serde_json::Value,
    pub state: StudyState,
    pub public: bool,
    /// Optimistic concurrency counter, bumped on every write.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a study. New studies always start in `draft` and private.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewStudy {
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub criteria: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub image: Option<String>,
    pub organization_id: String,
    #[serde(default = "empty_blocks")]
    pub blocks: serde_json::Value,
}

fn empty_blocks() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl NewStudy {
    #[must_use]
    pub fn new(name: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization_id: organization_id.into(),
            blocks: empty_blocks(),
            ..Self::default()
        }
    }
}
