//! Store configuration.
//!
//! # Responsibility
//! - Name the logical keys used against the persistence adapter.
//! - Carry per-store options with defaults matching the browser edition.

/// Logical persistence keys for the three durable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Case metadata snapshot (JSON object).
    pub meta: String,
    /// Records snapshot (JSON array).
    pub records: String,
    /// "Data warning dismissed" flag.
    pub warning_dismissed: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            meta: "chronos_meta".to_string(),
            records: "chronos_records".to_string(),
            warning_dismissed: "chronos_warning_dismissed".to_string(),
        }
    }
}

/// Options for opening a `RecordStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub keys: StorageKeys,
}

impl StoreConfig {
    /// Uses a custom key prefix, e.g. to keep several cases in one database.
    pub fn with_key_prefix(prefix: &str) -> Self {
        Self {
            keys: StorageKeys {
                meta: format!("{prefix}_meta"),
                records: format!("{prefix}_records"),
                warning_dismissed: format!("{prefix}_warning_dismissed"),
            },
        }
    }
}
