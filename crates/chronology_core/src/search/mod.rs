//! In-memory query entry points.
//!
//! # Responsibility
//! - Produce the view-ordered record sequence from store contents.
//! - Own sort-state transitions used by table headers.

pub mod query;
