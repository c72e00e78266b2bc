//! Chronology record, case metadata and record draft models.
//!
//! # Responsibility
//! - Define the canonical record shape shared by store, codec and query.
//! - Define the pending draft value submitted by form-like callers.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another record.
//! - `status` always belongs to the status catalog.
//! - Draft validation happens before a draft reaches the store's collection;
//!   records themselves are not re-validated.

use crate::model::status::CaseStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// ISO 8601 calendar date format used by records and export file names.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque unique record identifier.
///
/// Imported files may carry arbitrary id strings, so no format is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Generates a fresh identifier absent from `taken`.
    pub fn generate_unique(taken: &HashSet<RecordId>) -> Self {
        loop {
            let candidate = Self::generate();
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One dated entry of the case chronology.
///
/// Serialized with camelCase keys (`regNo`) to stay compatible with
/// snapshots written by the browser edition of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronologyRecord {
    pub id: RecordId,
    /// ISO 8601 `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub reg_no: String,
    pub name: String,
    #[serde(default)]
    pub correspondent: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub note: String,
}

impl ChronologyRecord {
    /// Builds a record from a draft under the given id.
    pub fn from_draft(id: RecordId, draft: RecordDraft) -> Self {
        Self {
            id,
            date: draft.date,
            reg_no: draft.reg_no,
            name: draft.name,
            correspondent: draft.correspondent,
            status: draft.status,
            note: draft.note,
        }
    }
}

/// Case-level metadata, one per dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseMeta {
    pub title: String,
    pub applicant: String,
    pub addressee: String,
    pub case_id: String,
}

/// Addressable `CaseMeta` field, used by single-field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Title,
    Applicant,
    Addressee,
    CaseId,
}

impl CaseMeta {
    /// Returns true when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.applicant.is_empty()
            && self.addressee.is_empty()
            && self.case_id.is_empty()
    }

    pub fn field_mut(&mut self, field: MetaField) -> &mut String {
        match field {
            MetaField::Title => &mut self.title,
            MetaField::Applicant => &mut self.applicant,
            MetaField::Addressee => &mut self.addressee,
            MetaField::CaseId => &mut self.case_id,
        }
    }

    /// Overwrites fields that are non-empty in `other`; empty ones are kept.
    pub fn merge_from(&mut self, other: &CaseMeta) {
        for (target, value) in [
            (&mut self.title, &other.title),
            (&mut self.applicant, &other.applicant),
            (&mut self.addressee, &other.addressee),
            (&mut self.case_id, &other.case_id),
        ] {
            if !value.is_empty() {
                target.clone_from(value);
            }
        }
    }
}

/// Validation failure for a submitted draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    EmptyDate,
    InvalidDate(String),
    EmptyName,
    EmptyCorrespondent,
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDate => write!(f, "record date is required"),
            Self::InvalidDate(value) => {
                write!(f, "record date `{value}` is not an ISO date (YYYY-MM-DD)")
            }
            Self::EmptyName => write!(f, "record name is required"),
            Self::EmptyCorrespondent => write!(f, "record correspondent is required"),
        }
    }
}

impl Error for DraftValidationError {}

/// Pending record value collected by a form before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: String,
    pub reg_no: String,
    pub name: String,
    pub correspondent: String,
    pub status: CaseStatus,
    pub note: String,
}

impl RecordDraft {
    /// Empty draft dated `today` with the default status.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format(ISO_DATE_FORMAT).to_string(),
            reg_no: String::new(),
            name: String::new(),
            correspondent: String::new(),
            status: CaseStatus::default(),
            note: String::new(),
        }
    }

    /// Empty draft dated with the current UTC day.
    pub fn today() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }

    /// Seeds a draft from an existing record for editing.
    pub fn from_record(record: &ChronologyRecord) -> Self {
        Self {
            date: record.date.clone(),
            reg_no: record.reg_no.clone(),
            name: record.name.clone(),
            correspondent: record.correspondent.clone(),
            status: record.status,
            note: record.note.clone(),
        }
    }

    /// Checks the required form fields.
    ///
    /// # Errors
    /// - Empty or non-ISO `date`.
    /// - Blank `name` or `correspondent`.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(DraftValidationError::EmptyDate);
        }
        if NaiveDate::parse_from_str(date, ISO_DATE_FORMAT).is_err() {
            return Err(DraftValidationError::InvalidDate(self.date.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(DraftValidationError::EmptyName);
        }
        if self.correspondent.trim().is_empty() {
            return Err(DraftValidationError::EmptyCorrespondent);
        }
        Ok(())
    }
}
