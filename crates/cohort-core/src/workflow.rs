//! Study lifecycle transition table.
//!
//! Every legal edge is one row in [`TRANSITIONS`]: the trigger, the states it
//! may fire from, the destination, the permissions that satisfy its guard,
//! and the effects that follow it in declaration order. The engine in
//! `cohort-db` interprets this table; nothing else decides what is legal.

use tracing::debug;

use crate::entities::Study;
use crate::enums::{StudyPermission, StudyState, Trigger};
use crate::errors::TransitionError;
use crate::identity::Actor;
use crate::notify::NotificationHook;

/// Something that happens because a transition fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Set the study's visibility flag. Applied before the study is persisted.
    SetPublic(bool),
    /// Invoke a notification hook. Dispatched after the transition commits.
    Notify(NotificationHook),
}

/// One edge of the lifecycle graph.
#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    pub trigger: Trigger,
    pub sources: &'static [StudyState],
    pub destination: StudyState,
    /// The guard passes if the actor holds any one of these.
    pub required: &'static [StudyPermission],
    pub effects: &'static [Effect],
}

const ADMIN: &[StudyPermission] = &[StudyPermission::Administer];
const OWNER_OR_ADMIN: &[StudyPermission] =
    &[StudyPermission::Submit, StudyPermission::Administer];

pub static TRANSITIONS: [Transition; 8] = [
    Transition {
        trigger: Trigger::Submit,
        sources: &[StudyState::Draft],
        destination: StudyState::Pending,
        required: OWNER_OR_ADMIN,
        effects: &[Effect::Notify(NotificationHook::AdministratorsOfSubmission)],
    },
    Transition {
        trigger: Trigger::Approve,
        sources: &[StudyState::Pending],
        destination: StudyState::Approved,
        required: ADMIN,
        effects: &[Effect::Notify(NotificationHook::SubmitterOfApproval)],
    },
    Transition {
        trigger: Trigger::Reject,
        sources: &[StudyState::Pending],
        destination: StudyState::Draft,
        required: ADMIN,
        effects: &[Effect::Notify(NotificationHook::SubmitterOfRejection)],
    },
    Transition {
        trigger: Trigger::Retract,
        sources: &[StudyState::Pending, StudyState::Approved],
        destination: StudyState::Draft,
        required: OWNER_OR_ADMIN,
        effects: &[Effect::Notify(NotificationHook::AdministratorsOfRetraction)],
    },
    Transition {
        trigger: Trigger::Activate,
        sources: &[StudyState::Approved],
        destination: StudyState::Active,
        required: ADMIN,
        effects: &[
            Effect::SetPublic(true),
            Effect::Notify(NotificationHook::AdministratorsOfActivation),
        ],
    },
    Transition {
        trigger: Trigger::Pause,
        sources: &[StudyState::Active],
        destination: StudyState::Paused,
        required: ADMIN,
        effects: &[Effect::Notify(NotificationHook::AdministratorsOfPause)],
    },
    Transition {
        trigger: Trigger::Resume,
        sources: &[StudyState::Paused],
        destination: StudyState::Active,
        required: ADMIN,
        effects: &[],
    },
    Transition {
        trigger: Trigger::Deactivate,
        sources: &[StudyState::Active, StudyState::Paused],
        destination: StudyState::Deactivated,
        required: ADMIN,
        effects: &[
            Effect::SetPublic(false),
            Effect::Notify(NotificationHook::AdministratorsOfDeactivation),
        ],
    },
];

impl Transition {
    /// Find the edge `trigger` takes out of `state`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidTransition` if no such edge exists.
    pub fn lookup(state: StudyState, trigger: Trigger) -> Result<&'static Self, TransitionError> {
        TRANSITIONS
            .iter()
            .find(|t| t.trigger == trigger && t.sources.contains(&state))
            .ok_or(TransitionError::InvalidTransition { state, trigger })
    }

    /// Evaluate the guard for `actor` acting on `study`.
    ///
    /// Superusers always pass. Everyone else needs one of `required` granted
    /// on this particular study.
    ///
    /// # Errors
    ///
    /// Returns `ActorRequired` when no actor is supplied and
    /// `PermissionDenied` when the actor lacks every required permission.
    pub fn authorize<'a>(
        &self,
        study: &Study,
        actor: Option<&'a Actor>,
    ) -> Result<&'a Actor, TransitionError> {
        let actor = actor.ok_or(TransitionError::ActorRequired {
            trigger: self.trigger,
        })?;

        if actor.is_superuser {
            debug!(user = %actor.user_id, trigger = %self.trigger, "guard bypassed for superuser");
            return Ok(actor);
        }

        if self
            .required
            .iter()
            .any(|perm| actor.has_permission(&study.uuid, *perm))
        {
            debug!(user = %actor.user_id, trigger = %self.trigger, study = %study.uuid, "guard passed");
            return Ok(actor);
        }

        Err(TransitionError::PermissionDenied {
            user_id: actor.user_id.clone(),
            trigger: self.trigger,
            study: study.uuid,
        })
    }

    /// Apply this edge to an in-memory study: new state plus field effects.
    pub fn apply(&self, study: &mut Study) {
        study.state = self.destination;
        for effect in self.effects {
            if let Effect::SetPublic(public) = effect {
                study.public = *public;
            }
        }
    }

    /// Notification hooks to run after commit, in declaration order.
    pub fn notifications(&self) -> impl Iterator<Item = NotificationHook> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(hook) => Some(*hook),
            Effect::SetPublic(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn study_in(state: StudyState) -> Study {
        Study {
            id: 1,
            uuid: Uuid::new_v4(),
            name: "Sleep and memory".into(),
            short_description: String::new(),
            long_description: String::new(),
            criteria: String::new(),
            duration: String::new(),
            contact_info: String::new(),
            image: None,
            organization_id: "org-1".into(),
            blocks: serde_json::json!({}),
            state,
            public: false,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(StudyState::Draft, Trigger::Submit, StudyState::Pending)]
    #[case(StudyState::Pending, Trigger::Approve, StudyState::Approved)]
    #[case(StudyState::Pending, Trigger::Reject, StudyState::Draft)]
    #[case(StudyState::Pending, Trigger::Retract, StudyState::Draft)]
    #[case(StudyState::Approved, Trigger::Retract, StudyState::Draft)]
    #[case(StudyState::Approved, Trigger::Activate, StudyState::Active)]
    #[case(StudyState::Active, Trigger::Pause, StudyState::Paused)]
    #[case(StudyState::Paused, Trigger::Resume, StudyState::Active)]
    #[case(StudyState::Active, Trigger::Deactivate, StudyState::Deactivated)]
    #[case(StudyState::Paused, Trigger::Deactivate, StudyState::Deactivated)]
    fn every_edge_resolves(
        #[case] from: StudyState,
        #[case] trigger: Trigger,
        #[case] to: StudyState,
    ) {
        let transition = Transition::lookup(from, trigger).unwrap();
        assert_eq!(transition.destination, to);
    }

    #[test]
    fn edge_count_matches_table() {
        let edges = StudyState::ALL
            .iter()
            .flat_map(|s| Trigger::ALL.iter().map(move |t| (*s, *t)))
            .filter(|(s, t)| Transition::lookup(*s, *t).is_ok())
            .count();
        assert_eq!(edges, 10);
    }

    #[test]
    fn draft_rejects_everything_but_submit() {
        for trigger in Trigger::ALL {
            let result = Transition::lookup(StudyState::Draft, trigger);
            if trigger == Trigger::Submit {
                assert!(result.is_ok());
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    TransitionError::InvalidTransition {
                        state: StudyState::Draft,
                        trigger
                    }
                );
            }
        }
    }

    #[test]
    fn deactivate_has_no_self_loop() {
        assert!(Transition::lookup(StudyState::Deactivated, Trigger::Deactivate).is_err());
    }

    #[test]
    fn guard_requires_actor() {
        let study = study_in(StudyState::Draft);
        let t = Transition::lookup(StudyState::Draft, Trigger::Submit).unwrap();
        assert_eq!(
            t.authorize(&study, None).unwrap_err(),
            TransitionError::ActorRequired {
                trigger: Trigger::Submit
            }
        );
    }

    #[test]
    fn superuser_bypasses_guard() {
        let study = study_in(StudyState::Pending);
        let t = Transition::lookup(StudyState::Pending, Trigger::Approve).unwrap();
        let root = Actor::superuser("root");
        assert!(t.authorize(&study, Some(&root)).is_ok());
    }

    #[test]
    fn submitter_cannot_approve() {
        let study = study_in(StudyState::Pending);
        let owner = Actor::new("owner").grant(study.uuid, StudyPermission::Submit);
        let t = Transition::lookup(StudyState::Pending, Trigger::Approve).unwrap();
        let err = t.authorize(&study, Some(&owner)).unwrap_err();
        assert!(matches!(err, TransitionError::PermissionDenied { ref user_id, .. } if user_id == "owner"));
    }

    #[test]
    fn submitter_can_retract() {
        let study = study_in(StudyState::Approved);
        let owner = Actor::new("owner").grant(study.uuid, StudyPermission::Submit);
        let t = Transition::lookup(StudyState::Approved, Trigger::Retract).unwrap();
        assert!(t.authorize(&study, Some(&owner)).is_ok());
    }

    #[test]
    fn grant_on_other_study_does_not_count() {
        let study = study_in(StudyState::Approved);
        let admin_elsewhere = Actor::new("a").grant_all(Uuid::new_v4());
        let t = Transition::lookup(StudyState::Approved, Trigger::Activate).unwrap();
        assert!(t.authorize(&study, Some(&admin_elsewhere)).is_err());
    }

    #[test]
    fn activate_then_deactivate_toggles_public() {
        let mut study = study_in(StudyState::Approved);
        Transition::lookup(study.state, Trigger::Activate)
            .unwrap()
            .apply(&mut study);
        assert_eq!(study.state, StudyState::Active);
        assert!(study.public);

        Transition::lookup(study.state, Trigger::Deactivate)
            .unwrap()
            .apply(&mut study);
        assert_eq!(study.state, StudyState::Deactivated);
        assert!(!study.public);
    }

    #[test]
    fn resume_has_no_notifications() {
        let t = Transition::lookup(StudyState::Paused, Trigger::Resume).unwrap();
        assert_eq!(t.notifications().count(), 0);
    }

    #[test]
    fn activate_notifies_administrators() {
        let t = Transition::lookup(StudyState::Approved, Trigger::Activate).unwrap();
        assert_eq!(
            t.notifications().collect::<Vec<_>>(),
            vec![NotificationHook::AdministratorsOfActivation]
        );
    }
}
