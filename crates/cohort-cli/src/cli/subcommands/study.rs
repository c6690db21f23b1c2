use clap::{Args, Subcommand};
use cohort_core::enums::{StudyPermission, StudyState};
use uuid::Uuid;

/// Study commands: authoring, queries, and one subcommand per trigger.
#[derive(Clone, Debug, Subcommand)]
pub enum StudyCommands {
    /// Create a study in draft.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        organization: String,
        #[command(flatten)]
        fields: StudyFields,
    },
    /// Edit descriptive fields of a draft study.
    Edit {
        uuid: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: StudyFields,
        /// Remove the image reference.
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },
    /// Fetch one study by uuid.
    Get { uuid: Uuid },
    /// List studies, newest first.
    List {
        /// Only studies in this state.
        #[arg(long, conflicts_with = "public")]
        state: Option<StudyState>,
        /// Only studies visible to participants (active and public).
        #[arg(long)]
        public: bool,
    },
    /// Transition history of one study, oldest first.
    History { uuid: Uuid },
    /// Triggers the given actor could fire right now.
    Triggers {
        uuid: Uuid,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// draft -> pending
    Submit(TransitionArgs),
    /// pending -> approved
    Approve(TransitionArgs),
    /// pending -> draft
    Reject(TransitionArgs),
    /// pending | approved -> draft
    Retract(TransitionArgs),
    /// approved -> active, made public
    Activate(TransitionArgs),
    /// active -> paused
    Pause(TransitionArgs),
    /// paused -> active
    Resume(TransitionArgs),
    /// active | paused -> deactivated, hidden
    Deactivate(TransitionArgs),
}

/// Optional descriptive fields shared by `create` and `edit`.
#[derive(Clone, Debug, Default, Args)]
pub struct StudyFields {
    #[arg(long)]
    pub short_description: Option<String>,
    #[arg(long)]
    pub long_description: Option<String>,
    #[arg(long)]
    pub criteria: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub contact_info: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    /// Study content as a JSON document.
    #[arg(long)]
    pub blocks: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TransitionArgs {
    pub uuid: Uuid,
    #[command(flatten)]
    pub actor: ActorArgs,
}

/// The acting user, as resolved by whatever authenticated the caller.
#[derive(Clone, Debug, Default, Args)]
pub struct ActorArgs {
    /// Acting user id. Omit to act anonymously.
    #[arg(long)]
    pub user: Option<String>,
    /// Display name of the acting user.
    #[arg(long, requires = "user")]
    pub username: Option<String>,
    /// Treat the acting user as a superuser.
    #[arg(long, requires = "user")]
    pub superuser: bool,
    /// Permissions the acting user holds on this study (comma separated).
    #[arg(long = "grant", value_delimiter = ',', requires = "user")]
    pub grants: Vec<StudyPermission>,
}
