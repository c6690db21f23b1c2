mod study;

pub use study::{ActorArgs, StudyCommands, StudyFields, TransitionArgs};
