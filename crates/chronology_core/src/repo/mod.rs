//! Persistence adapter contracts and snapshot storage.
//!
//! # Responsibility
//! - Define the key-value contract the record store persists through.
//! - Keep SQLite and JSON details out of the service layer.
//!
//! # Invariants
//! - Snapshots are written whole; there are no partial updates.
//! - Read paths report corrupt snapshots instead of masking them.

pub mod kv_store;
pub mod snapshot;
