//! # cohort-core
//!
//! Core types and the study lifecycle workflow for Cohort.
//!
//! This crate provides the foundational types shared across all Cohort crates:
//! - Entity structs for studies and their append-only transition log
//! - State, trigger, and permission enums
//! - The static transition table with guard and effect descriptions
//! - The notification hook capability set invoked after transitions
//! - Cross-cutting error types
//!
//! Nothing here performs I/O. Persistence and the transactional engine live
//! in `cohort-db`.

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod notify;
pub mod workflow;
