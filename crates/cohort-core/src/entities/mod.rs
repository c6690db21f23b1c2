//! Entity structs for Cohort domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `cohort-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod study;
mod study_log;

pub use study::{NewStudy, Study};
pub use study_log::StudyLog;
