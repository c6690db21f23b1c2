use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::StudyPermission;

/// The authenticated user acting on a study.
///
/// Produced by the surrounding application's auth layer, which also resolves
/// the per-study permission grants. The workflow never authenticates; it only
/// reads this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub username: Option<String>,
    /// Superusers pass every guard unconditionally.
    pub is_superuser: bool,
    /// Permissions keyed by study uuid.
    #[serde(default)]
    pub grants: BTreeMap<Uuid, BTreeSet<StudyPermission>>,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn superuser(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_superuser: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Grant `permission` on the study identified by `study`.
    #[must_use]
    pub fn grant(mut self, study: Uuid, permission: StudyPermission) -> Self {
        self.grants.entry(study).or_default().insert(permission);
        self
    }

    /// Grant everything the study's admin group would hold.
    #[must_use]
    pub fn grant_all(mut self, study: Uuid) -> Self {
        self.grants
            .entry(study)
            .or_default()
            .extend(StudyPermission::ALL);
        self
    }

    #[must_use]
    pub fn has_permission(&self, study: &Uuid, permission: StudyPermission) -> bool {
        self.grants
            .get(study)
            .is_some_and(|perms| perms.contains(&permission))
    }

    /// Name used in logs and notifications.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_are_scoped_to_one_study() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let actor = Actor::new("u-1").grant(a, StudyPermission::Submit);

        assert!(actor.has_permission(&a, StudyPermission::Submit));
        assert!(!actor.has_permission(&a, StudyPermission::Administer));
        assert!(!actor.has_permission(&b, StudyPermission::Submit));
    }

    #[test]
    fn grant_all_covers_every_permission() {
        let study = Uuid::new_v4();
        let actor = Actor::new("admin").grant_all(study);
        for perm in StudyPermission::ALL {
            assert!(actor.has_permission(&study, perm));
        }
    }

    #[test]
    fn display_name_prefers_username() {
        assert_eq!(Actor::new("u-7").display_name(), "u-7");
        assert_eq!(Actor::new("u-7").with_username("ada").display_name(), "ada");
    }
}
