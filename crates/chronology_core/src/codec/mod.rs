//! Delimited-text backup format.
//!
//! # Responsibility
//! - Serialize case metadata and records into the semicolon CSV layout.
//! - Parse that layout back, tolerating spreadsheet-edited and foreign files.
//!
//! # Invariants
//! - Parsing never fails on content; malformed input degrades to skipped
//!   rows or default values.
//! - Only file I/O helpers return errors.

pub mod csv;
