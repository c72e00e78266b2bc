//! Record store use-case service.
//!
//! # Responsibility
//! - Exclusively own the chronology records and case metadata.
//! - Persist a full snapshot after every applied mutation.
//! - Merge CSV imports and render CSV exports.
//! - Notify subscribers about applied changes.
//!
//! # Invariants
//! - Record ids are unique within the store at all times.
//! - Update/delete with an unknown id is a silent no-op (`Ok(false)`).
//! - Persistence is not transactional: when the adapter write fails, the
//!   in-memory change stays applied and the error is returned.
//! - Log events carry ids and counts only, never user-entered text.

use crate::codec::csv::{export_csv, parse_csv};
use crate::config::StoreConfig;
use crate::model::record::{
    CaseMeta, ChronologyRecord, DraftValidationError, MetaField, RecordDraft, RecordId,
};
use crate::repo::kv_store::{KeyValueStore, RepoError};
use crate::repo::snapshot::{clear_snapshot, load_snapshot, save_snapshot};
use crate::search::query::{apply_query, RecordQuery};
use crate::service::events::{StoreEvent, Subscribers, SubscriptionId};
use crate::service::pending_action::{PendingAction, PendingActionKind};
use crate::service::stats::{compute_stats, CaseStats};
use chrono::NaiveDate;
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const WARNING_DISMISSED_VALUE: &str = "true";

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug)]
pub enum StoreError {
    /// Submitted draft failed form-boundary checks.
    Validation(DraftValidationError),
    /// Persistence adapter failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DraftValidationError> for StoreError {
    fn from(value: DraftValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped_malformed: usize,
    pub skipped_duplicate: usize,
    /// Whether metadata from the file was merged into the case meta.
    pub meta_applied: bool,
}

/// Owner of the chronology dataset.
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    meta: CaseMeta,
    records: Vec<ChronologyRecord>,
    pending: Option<PendingAction>,
    subscribers: Subscribers,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Opens a store with default keys and loads the persisted snapshot.
    pub fn open(storage: S) -> StoreResult<Self> {
        Self::open_with_config(storage, StoreConfig::default())
    }

    /// Opens a store and loads the snapshot stored under `config.keys`.
    ///
    /// # Errors
    /// - Adapter read failures.
    /// - `RepoError::InvalidData` for a corrupt snapshot.
    pub fn open_with_config(storage: S, config: StoreConfig) -> StoreResult<Self> {
        let snapshot = load_snapshot(&storage, &config.keys).map_err(|err| {
            error!("event=store_open module=store status=error error={err}");
            err
        })?;
        info!(
            "event=store_open module=store status=ok records={}",
            snapshot.records.len()
        );

        Ok(Self {
            storage,
            config,
            meta: snapshot.meta,
            records: snapshot.records,
            pending: None,
            subscribers: Subscribers::default(),
        })
    }

    pub fn records(&self) -> &[ChronologyRecord] {
        &self.records
    }

    pub fn meta(&self) -> &CaseMeta {
        &self.meta
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: &RecordId) -> Option<&ChronologyRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Recomputed on every call.
    pub fn stats(&self) -> CaseStats {
        compute_stats(&self.records)
    }

    /// Filtered and sorted view of the current records.
    pub fn view(&self, query: &RecordQuery) -> Vec<&ChronologyRecord> {
        apply_query(&self.records, query)
    }

    /// Appends a new record with a fresh id.
    pub fn create(&mut self, draft: RecordDraft) -> StoreResult<RecordId> {
        draft.validate()?;

        let id = RecordId::generate_unique(&self.record_ids());
        self.records
            .push(ChronologyRecord::from_draft(id.clone(), draft));
        info!(
            "event=record_create module=store status=ok record_id={id} total={}",
            self.records.len()
        );

        self.commit(StoreEvent::RecordCreated(id.clone()))?;
        Ok(id)
    }

    /// Replaces every field of the record with `id`, keeping the id.
    ///
    /// Returns `Ok(false)` when no such record exists.
    pub fn update(&mut self, id: &RecordId, draft: RecordDraft) -> StoreResult<bool> {
        draft.validate()?;

        let Some(slot) = self.records.iter_mut().find(|record| &record.id == id) else {
            info!("event=record_update module=store status=noop record_id={id}");
            return Ok(false);
        };
        *slot = ChronologyRecord::from_draft(id.clone(), draft);
        info!("event=record_update module=store status=ok record_id={id}");

        self.commit(StoreEvent::RecordUpdated(id.clone()))?;
        Ok(true)
    }

    /// Removes the record with `id`.
    ///
    /// Returns `Ok(false)` when no such record exists.
    pub fn delete(&mut self, id: &RecordId) -> StoreResult<bool> {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        if self.records.len() == before {
            info!("event=record_delete module=store status=noop record_id={id}");
            return Ok(false);
        }
        info!(
            "event=record_delete module=store status=ok record_id={id} total={}",
            self.records.len()
        );

        self.commit(StoreEvent::RecordDeleted(id.clone()))?;
        Ok(true)
    }

    /// Clears records, restores empty metadata and removes the snapshot.
    pub fn reset(&mut self) -> StoreResult<()> {
        let removed = self.records.len();
        self.records.clear();
        self.meta = CaseMeta::default();
        info!("event=store_reset module=store status=ok removed={removed}");

        let result = clear_snapshot(&self.storage, &self.config.keys).map_err(|err| {
            error!("event=snapshot_clear module=store status=error error={err}");
            StoreError::from(err)
        });
        self.subscribers.notify(&StoreEvent::Reset);
        result
    }

    /// Replaces case metadata wholesale.
    pub fn set_meta(&mut self, meta: CaseMeta) -> StoreResult<()> {
        self.meta = meta;
        self.commit(StoreEvent::MetaChanged)
    }

    /// Replaces one metadata field.
    pub fn set_meta_field(&mut self, field: MetaField, value: impl Into<String>) -> StoreResult<()> {
        *self.meta.field_mut(field) = value.into();
        self.commit(StoreEvent::MetaChanged)
    }

    /// Merges CSV text into the store, dating undated rows with today (UTC).
    pub fn import_csv(&mut self, text: &str) -> StoreResult<ImportReport> {
        self.import_csv_dated(text, chrono::Utc::now().date_naive())
    }

    /// Merges CSV text into the store using `today` for undated rows.
    ///
    /// Malformed rows, unknown statuses and duplicate ids degrade silently;
    /// only persistence failures are returned as errors.
    pub fn import_csv_dated(&mut self, text: &str, today: NaiveDate) -> StoreResult<ImportReport> {
        let parsed = parse_csv(text, &self.record_ids(), today);
        let report = ImportReport {
            added: parsed.records.len(),
            skipped_malformed: parsed.skipped_malformed,
            skipped_duplicate: parsed.skipped_duplicate,
            meta_applied: parsed.meta.is_some(),
        };
        info!(
            "event=csv_import module=store status=ok added={} skipped_malformed={} skipped_duplicate={} meta_applied={}",
            report.added, report.skipped_malformed, report.skipped_duplicate, report.meta_applied
        );

        if let Some(meta) = parsed.meta.as_ref() {
            self.meta.merge_from(meta);
        }
        self.records.extend(parsed.records);

        if report.added == 0 && !report.meta_applied {
            return Ok(report);
        }
        self.commit(StoreEvent::RecordsImported {
            added: report.added,
        })?;
        Ok(report)
    }

    /// Renders the current dataset as backup CSV text.
    pub fn export_csv(&self) -> String {
        info!(
            "event=csv_export module=store status=ok rows={}",
            self.records.len()
        );
        export_csv(&self.meta, &self.records)
    }

    /// Whether the user asked not to see the local-data warning again.
    pub fn warning_dismissed(&self) -> StoreResult<bool> {
        let value = self
            .storage
            .get(self.config.keys.warning_dismissed.as_str())?;
        Ok(value.is_some())
    }

    /// Persists the "warning dismissed" flag.
    pub fn dismiss_warning(&self) -> StoreResult<()> {
        self.storage.set(
            self.config.keys.warning_dismissed.as_str(),
            WARNING_DISMISSED_VALUE,
        )?;
        Ok(())
    }

    /// Stages deletion of one record until `confirm`.
    pub fn request_delete(&mut self, id: RecordId) -> &PendingAction {
        self.pending.insert(PendingAction::delete_one(id))
    }

    /// Stages a full reset until `confirm`.
    pub fn request_clear_all(&mut self) -> &PendingAction {
        self.pending.insert(PendingAction::clear_all())
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Executes the pending action, if any, and clears it.
    ///
    /// Returns the executed action kind, or `None` when nothing was pending.
    pub fn confirm(&mut self) -> StoreResult<Option<PendingActionKind>> {
        let Some(action) = self.pending.take() else {
            return Ok(None);
        };
        match &action.kind {
            PendingActionKind::DeleteOne(id) => {
                self.delete(id)?;
            }
            PendingActionKind::ClearAll => self.reset()?,
        }
        Ok(Some(action.kind))
    }

    /// Drops the pending action without executing it.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(listener))
    }

    /// Removes a listener; returns false for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn record_ids(&self) -> HashSet<RecordId> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    /// Persists the full snapshot, then notifies subscribers.
    fn commit(&mut self, event: StoreEvent) -> StoreResult<()> {
        let result = save_snapshot(&self.storage, &self.config.keys, &self.meta, &self.records)
            .map_err(|err| {
                error!("event=snapshot_save module=store status=error error={err}");
                StoreError::from(err)
            });
        self.subscribers.notify(&event);
        result
    }
}
