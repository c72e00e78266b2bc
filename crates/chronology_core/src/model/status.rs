//! Case status catalog.
//!
//! # Responsibility
//! - Define the fixed, ordered set of case-status codes and display labels.
//! - Resolve free-form status tokens (codes or labels) to a catalog entry.
//!
//! # Invariants
//! - Catalog order is fixed; the first entry (`created`) is the fallback for
//!   every unresolvable status value.
//! - A `CaseStatus` value always maps to exactly one catalog entry.
//! - Serialized form is the status code, never the label.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of one chronology record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseStatus {
    /// Document is being prepared.
    #[default]
    Created,
    /// Document has been sent to the addressee.
    Sent,
    /// Addressee registered the document.
    Registered,
    /// Addressee is working on it.
    Processing,
    /// Request satisfied or executed.
    Satisfied,
    /// Request rejected.
    Rejected,
    /// Addressee did not respond.
    Ignored,
}

/// One row of the status catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: CaseStatus,
    /// Stable machine code used in snapshots.
    pub code: &'static str,
    /// Human-readable label used in CSV export.
    pub label: &'static str,
    /// Colour token for presentation layers.
    pub hint: &'static str,
}

static STATUS_CATALOG: [StatusEntry; 7] = [
    StatusEntry {
        status: CaseStatus::Created,
        code: "created",
        label: "Подготовка",
        hint: "slate",
    },
    StatusEntry {
        status: CaseStatus::Sent,
        code: "sent",
        label: "Отправлено",
        hint: "blue",
    },
    StatusEntry {
        status: CaseStatus::Registered,
        code: "registered",
        label: "Зарегистрировано",
        hint: "indigo",
    },
    StatusEntry {
        status: CaseStatus::Processing,
        code: "processing",
        label: "В работе",
        hint: "yellow",
    },
    StatusEntry {
        status: CaseStatus::Satisfied,
        code: "satisfied",
        label: "Удовлетворено / Исполнено",
        hint: "emerald",
    },
    StatusEntry {
        status: CaseStatus::Rejected,
        code: "rejected",
        label: "Отказано",
        hint: "red",
    },
    StatusEntry {
        status: CaseStatus::Ignored,
        code: "ignored",
        label: "Игнорирование",
        hint: "orange",
    },
];

/// Returns the full catalog in display order.
pub fn status_catalog() -> &'static [StatusEntry] {
    &STATUS_CATALOG
}

/// Looks up an entry by code, falling back to the first catalog entry.
pub fn find_by_code(code: &str) -> &'static StatusEntry {
    STATUS_CATALOG
        .iter()
        .find(|entry| entry.code == code)
        .unwrap_or(&STATUS_CATALOG[0])
}

/// Looks up an entry by its exact display label.
pub fn find_by_label(label: &str) -> Option<&'static StatusEntry> {
    STATUS_CATALOG.iter().find(|entry| entry.label == label)
}

/// Resolves an imported status token: code first, then label, then default.
pub fn resolve_status_token(token: &str) -> CaseStatus {
    STATUS_CATALOG
        .iter()
        .find(|entry| entry.code == token)
        .or_else(|| find_by_label(token))
        .map_or(CaseStatus::default(), |entry| entry.status)
}

impl CaseStatus {
    /// Catalog entry for this status.
    pub fn entry(self) -> &'static StatusEntry {
        // Catalog order mirrors enum declaration order.
        &STATUS_CATALOG[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.entry().code
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn hint(self) -> &'static str {
        self.entry().hint
    }

    /// Whether this status counts as a successful closure.
    pub fn is_success(self) -> bool {
        self == Self::Satisfied
    }

    /// Whether this status counts as a failed closure.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Rejected | Self::Ignored)
    }
}

impl Serialize for CaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(find_by_code(code.as_str()).status)
    }
}
