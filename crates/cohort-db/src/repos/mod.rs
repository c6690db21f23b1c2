//! Repository modules for studies and their transition log.
//!
//! Each module adds methods to `CohortService` via `impl CohortService` blocks.
//! Row-level helpers are `pub(crate)` free functions over a borrowed
//! connection so the workflow engine can run them inside its transaction.

pub mod study;
pub mod study_log;
