//! Record filter/sort query engine.
//!
//! # Responsibility
//! - Filter records by case-insensitive substring over every field.
//! - Order records by one field with a stable sort.
//!
//! # Invariants
//! - `apply_query` is pure: same inputs, same output, no store mutation.
//! - Records comparing equal on the sort key keep their store order.
//! - Default sort is `date` descending.

use crate::model::record::ChronologyRecord;

/// Sortable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    #[default]
    Date,
    RegNo,
    Name,
    Correspondent,
    Status,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header-click transition.
    ///
    /// Same key flips the direction; a different key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Free-text filter plus sort state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Empty text disables filtering.
    pub text: String,
    pub sort: SortState,
}

impl RecordQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sort: SortState::default(),
        }
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = SortState::new(key, direction);
        self
    }
}

/// Filters and orders records for display.
pub fn apply_query<'a>(
    records: &'a [ChronologyRecord],
    query: &RecordQuery,
) -> Vec<&'a ChronologyRecord> {
    let needle = query.text.to_lowercase();
    let mut view = records
        .iter()
        .filter(|record| needle.is_empty() || matches_text(record, needle.as_str()))
        .collect::<Vec<_>>();

    let SortState { key, direction } = query.sort;
    // `sort_by` is stable, so equal keys keep insertion order in both directions.
    view.sort_by(|left, right| {
        let ordering = sort_value(left, key).cmp(sort_value(right, key));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    view
}

/// Returns true when any field's text contains the lower-cased needle.
pub fn matches_text(record: &ChronologyRecord, lowered_needle: &str) -> bool {
    field_values(record)
        .iter()
        .any(|value| value.to_lowercase().contains(lowered_needle))
}

fn field_values(record: &ChronologyRecord) -> [&str; 7] {
    [
        record.id.as_str(),
        record.date.as_str(),
        record.reg_no.as_str(),
        record.name.as_str(),
        record.correspondent.as_str(),
        record.status.code(),
        record.note.as_str(),
    ]
}

fn sort_value(record: &ChronologyRecord, key: SortKey) -> &str {
    match key {
        SortKey::Id => record.id.as_str(),
        SortKey::Date => record.date.as_str(),
        SortKey::RegNo => record.reg_no.as_str(),
        SortKey::Name => record.name.as_str(),
        SortKey::Correspondent => record.correspondent.as_str(),
        SortKey::Status => record.status.code(),
        SortKey::Note => record.note.as_str(),
    }
}

