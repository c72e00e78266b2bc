//! Core logic for the case chronology tracker.
//! This crate is the single source of truth for the record store, its
//! queries and the CSV backup format.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use codec::csv::{
    export_csv, export_file_name, parse_csv, read_import_file, write_export_file, CodecError,
    CodecResult, ParsedImport, COLUMN_HEADERS, IMPORT_PLACEHOLDER_NAME,
};
pub use config::{StorageKeys, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    CaseMeta, ChronologyRecord, DraftValidationError, MetaField, RecordDraft, RecordId,
};
pub use model::status::{
    find_by_code, find_by_label, resolve_status_token, status_catalog, CaseStatus, StatusEntry,
};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use repo::snapshot::{clear_snapshot, load_snapshot, save_snapshot, Snapshot};
pub use search::query::{apply_query, RecordQuery, SortDirection, SortKey, SortState};
pub use service::events::{StoreEvent, SubscriptionId};
pub use service::pending_action::{PendingAction, PendingActionKind};
pub use service::record_store::{ImportReport, RecordStore, StoreError, StoreResult};
pub use service::stats::{compute_stats, CaseStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
