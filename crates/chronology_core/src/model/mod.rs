//! Domain model for the case chronology.
//!
//! # Responsibility
//! - Define canonical data structures used by store, codec and query.
//! - Own the fixed status vocabulary.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod record;
pub mod status;
