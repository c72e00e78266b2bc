//! Core use-case services.
//!
//! # Responsibility
//! - Own the mutable dataset and expose use-case level operations.
//! - Keep presentation callers decoupled from storage and codec details.

pub mod events;
pub mod pending_action;
pub mod record_store;
pub mod stats;
