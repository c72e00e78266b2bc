//! Whole-dataset snapshot read/write over a `KeyValueStore`.
//!
//! # Invariants
//! - Meta and records are stored as separate JSON values under their keys.
//! - A missing key loads as the empty default.
//! - Unknown status codes inside stored records load as the default status.

use crate::config::StorageKeys;
use crate::model::record::{CaseMeta, ChronologyRecord};
use crate::repo::kv_store::{KeyValueStore, RepoError, RepoResult};
use serde::de::DeserializeOwned;

/// In-memory image of one persisted dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub meta: CaseMeta,
    pub records: Vec<ChronologyRecord>,
}

/// Loads meta and records; absent keys yield defaults.
///
/// # Errors
/// - Adapter read failures.
/// - `RepoError::InvalidData` when stored text is not the expected JSON.
pub fn load_snapshot<S: KeyValueStore>(store: &S, keys: &StorageKeys) -> RepoResult<Snapshot> {
    let meta = load_json::<_, CaseMeta>(store, keys.meta.as_str())?.unwrap_or_default();
    let records =
        load_json::<_, Vec<ChronologyRecord>>(store, keys.records.as_str())?.unwrap_or_default();
    Ok(Snapshot { meta, records })
}

/// Replaces both snapshot values.
pub fn save_snapshot<S: KeyValueStore>(
    store: &S,
    keys: &StorageKeys,
    meta: &CaseMeta,
    records: &[ChronologyRecord],
) -> RepoResult<()> {
    let meta_json = serde_json::to_string(meta).map_err(RepoError::Encode)?;
    let records_json = serde_json::to_string(records).map_err(RepoError::Encode)?;
    store.set(keys.meta.as_str(), meta_json.as_str())?;
    store.set(keys.records.as_str(), records_json.as_str())?;
    Ok(())
}

/// Removes both snapshot values. The warning flag is left untouched.
pub fn clear_snapshot<S: KeyValueStore>(store: &S, keys: &StorageKeys) -> RepoResult<()> {
    store.remove(keys.records.as_str())?;
    store.remove(keys.meta.as_str())?;
    Ok(())
}

fn load_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> RepoResult<Option<T>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(text.as_str())
        .map(Some)
        .map_err(|err| RepoError::InvalidData(format!("key `{key}`: {err}")))
}
