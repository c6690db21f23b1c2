//! Typed payload stored in the `detail` column of a study log row.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{StudyState, Trigger};

/// Where a logged transition came from and what fired it.
///
/// The row's `action` only names the destination state, so `reject` and
/// `retract` both log `draft`; this detail keeps them apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransitionDetail {
    pub from: StudyState,
    pub trigger: Trigger,
}
