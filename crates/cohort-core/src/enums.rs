//! Status and action enums for the study lifecycle.
//!
//! All enums serialize as `snake_case` strings and are stored as TEXT columns.
//! `StudyState` documents its transitions; the authoritative edge set (with
//! guards and effects) lives in [`crate::workflow::TRANSITIONS`].

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// StudyState
// ---------------------------------------------------------------------------

/// Lifecycle state of a study.
///
/// ```text
/// draft → pending → approved → active ⇄ paused
/// pending → draft            (reject, retract)
/// approved → draft           (retract)
/// active, paused → deactivated
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StudyState {
    #[default]
    Draft,
    Pending,
    Approved,
    Active,
    Paused,
    Deactivated,
}

impl StudyState {
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::Active,
        Self::Paused,
        Self::Deactivated,
    ];

    /// States reachable in one step, derived from the transition table.
    #[must_use]
    pub fn allowed_next_states(self) -> Vec<Self> {
        let mut next: Vec<Self> = crate::workflow::TRANSITIONS
            .iter()
            .filter(|t| t.sources.contains(&self))
            .map(|t| t.destination)
            .collect();
        next.sort();
        next.dedup();
        next
    }

    /// Triggers that are legal from this state, in table order.
    #[must_use]
    pub fn available_triggers(self) -> Vec<Trigger> {
        crate::workflow::TRANSITIONS
            .iter()
            .filter(|t| t.sources.contains(&self))
            .map(|t| t.trigger)
            .collect()
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deactivated)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for StudyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown study state '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Named action requested against a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Submit,
    Approve,
    Reject,
    Retract,
    Activate,
    Pause,
    Resume,
    Deactivate,
}

impl Trigger {
    pub const ALL: [Self; 8] = [
        Self::Submit,
        Self::Approve,
        Self::Reject,
        Self::Retract,
        Self::Activate,
        Self::Pause,
        Self::Resume,
        Self::Deactivate,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Retract => "retract",
            Self::Activate => "activate",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|trigger| trigger.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown trigger '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// StudyPermission
// ---------------------------------------------------------------------------

/// Per-study permission granted to a user by the surrounding application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StudyPermission {
    View,
    Edit,
    Submit,
    Respond,
    Administer,
}

impl StudyPermission {
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::Edit,
        Self::Submit,
        Self::Respond,
        Self::Administer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Submit => "submit",
            Self::Respond => "respond",
            Self::Administer => "administer",
        }
    }
}

impl fmt::Display for StudyPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyPermission {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|perm| perm.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown permission '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
