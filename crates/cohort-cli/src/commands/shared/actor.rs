use cohort_core::identity::Actor;
use uuid::Uuid;

use crate::cli::subcommands::ActorArgs;

/// Build the acting user for `study` from command-line flags.
///
/// Grants apply to the target study only. No `--user` means no actor.
#[must_use]
pub fn resolve_actor(args: &ActorArgs, study: Uuid) -> Option<Actor> {
    let user = args.user.as_deref()?;
    let mut actor = if args.superuser {
        Actor::superuser(user)
    } else {
        Actor::new(user)
    };
    if let Some(username) = &args.username {
        actor = actor.with_username(username);
    }
    Some(
        args.grants
            .iter()
            .fold(actor, |actor, perm| actor.grant(study, *perm)),
    )
}
