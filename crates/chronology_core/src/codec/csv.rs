//! Semicolon-delimited CSV export and lenient import.
//!
//! # Responsibility
//! - Render the backup file: metadata block, blank line, header, data rows.
//! - Parse arbitrary user text into importable records and case metadata.
//!
//! # Invariants
//! - Export quotes every data field and doubles embedded quotes.
//! - Export renders status as its display label; import accepts code or label.
//! - Import drops rows whose id already exists in the store or earlier in the
//!   same batch; dedup is by id only.
//! - Imported records keep file order.

use crate::model::record::{
    CaseMeta, ChronologyRecord, MetaField, RecordId, ISO_DATE_FORMAT,
};
use crate::model::status::resolve_status_token;
use chrono::NaiveDate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Field delimiter (regional spreadsheet convention).
pub const CSV_DELIMITER: char = ';';
/// Byte-order marker prepended to exported text.
pub const UTF8_BOM: char = '\u{FEFF}';
/// Column header labels in export order.
pub const COLUMN_HEADERS: [&str; 7] = [
    "ID",
    "Дата",
    "Номер",
    "Наименование",
    "Корреспондент",
    "Статус",
    "Примечание",
];
/// Name given to imported rows that carry no name.
pub const IMPORT_PLACEHOLDER_NAME: &str = "Импорт";

const META_LABELS: [(&str, MetaField); 4] = [
    ("Дело", MetaField::Title),
    ("Номер", MetaField::CaseId),
    ("Заявитель", MetaField::Applicant),
    ("Адресат", MetaField::Addressee),
];
const HEADER_MARKERS: [&str; 3] = ["ID", "Дата", "Статус"];
const HEADER_SCAN_LIMIT: usize = 20;
const MIN_ROW_FIELDS: usize = 5;
const MIN_REUSED_ID_CHARS: usize = 3;
const EXPORT_FILE_PREFIX: &str = "Chronology";
const EXPORT_FALLBACK_TOKEN: &str = "Export";

static QUOTE_EDGES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"|"$"#).expect("valid quote-edge regex"));

pub type CodecResult<T> = Result<T, CodecError>;

/// File-level failure around the codec.
#[derive(Debug)]
pub enum CodecError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "csv file `{}`: {source}", path.display()),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Result of parsing one import text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    /// Metadata found above the header; `None` when every field was empty.
    pub meta: Option<CaseMeta>,
    /// Rows that survived validation and dedup, in file order.
    pub records: Vec<ChronologyRecord>,
    /// Data lines with fewer than five fields.
    pub skipped_malformed: usize,
    /// Data lines whose id was already known.
    pub skipped_duplicate: usize,
}

/// Renders the full backup text, BOM included.
pub fn export_csv(meta: &CaseMeta, records: &[ChronologyRecord]) -> String {
    let mut out = String::new();
    out.push(UTF8_BOM);

    for (label, field) in META_LABELS {
        out.push_str(&format!("{label}:{CSV_DELIMITER}{}\n", meta_value(meta, field)));
    }
    out.push('\n');
    out.push_str(&COLUMN_HEADERS.join(";"));

    for record in records {
        out.push('\n');
        out.push_str(&export_row(record));
    }
    out
}

/// `Chronology_<caseId or Export>_<YYYY-MM-DD>.csv`
pub fn export_file_name(meta: &CaseMeta, date: NaiveDate) -> String {
    let token = if meta.case_id.is_empty() {
        EXPORT_FALLBACK_TOKEN.to_string()
    } else {
        // Case numbers like `2-1234/2024` must not introduce path segments.
        meta.case_id.replace(['/', '\\'], "-")
    };
    format!(
        "{EXPORT_FILE_PREFIX}_{token}_{}.csv",
        date.format(ISO_DATE_FORMAT)
    )
}

/// Writes the export into `dir` under the conventional file name.
///
/// # Errors
/// - Returns `CodecError::Io` when the file cannot be written.
pub fn write_export_file(
    dir: impl AsRef<Path>,
    meta: &CaseMeta,
    records: &[ChronologyRecord],
    date: NaiveDate,
) -> CodecResult<PathBuf> {
    let path = dir.as_ref().join(export_file_name(meta, date));
    std::fs::write(&path, export_csv(meta, records)).map_err(|source| CodecError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=csv_export_write module=codec status=ok rows={}",
        records.len()
    );
    Ok(path)
}

/// Reads an import file as text.
///
/// Invalid UTF-8 is decoded lossily rather than rejected.
///
/// # Errors
/// - Returns `CodecError::Io` when the file cannot be read.
pub fn read_import_file(path: impl AsRef<Path>) -> CodecResult<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8(bytes).unwrap_or_else(|err| {
        warn!("event=csv_import_read module=codec status=degraded reason=invalid_utf8");
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    }))
}

/// Parses import text against the ids already present in the store.
///
/// Rows with empty `date` get `today`; rows with empty `name` get
/// [`IMPORT_PLACEHOLDER_NAME`].
pub fn parse_csv(text: &str, existing: &HashSet<RecordId>, today: NaiveDate) -> ParsedImport {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let lines = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();

    let header_index = find_header(&lines);
    let mut parsed = ParsedImport::default();

    if let Some(index) = header_index.filter(|index| *index > 0) {
        let meta = parse_meta_block(&lines[..index]);
        if !meta.is_empty() {
            parsed.meta = Some(meta);
        }
    }

    let data_start = header_index.map_or(0, |index| index + 1);
    let mut batch_ids: HashSet<RecordId> = HashSet::new();
    let today_iso = today.format(ISO_DATE_FORMAT).to_string();

    for line in &lines[data_start..] {
        let fields = split_fields(line);
        if fields.len() < MIN_ROW_FIELDS {
            parsed.skipped_malformed += 1;
            continue;
        }

        let id = if fields[0].chars().count() >= MIN_REUSED_ID_CHARS {
            RecordId::new(fields[0].as_str())
        } else {
            let taken = existing.union(&batch_ids).cloned().collect();
            RecordId::generate_unique(&taken)
        };
        if existing.contains(&id) || batch_ids.contains(&id) {
            parsed.skipped_duplicate += 1;
            continue;
        }
        batch_ids.insert(id.clone());

        parsed
            .records
            .push(build_record(id, &fields, today_iso.as_str()));
    }

    parsed
}

fn build_record(id: RecordId, fields: &[String], today_iso: &str) -> ChronologyRecord {
    let field = |index: usize| fields.get(index).cloned().unwrap_or_default();
    let or_default = |value: String, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    };

    ChronologyRecord {
        id,
        date: or_default(field(1), today_iso),
        reg_no: field(2),
        name: or_default(field(3), IMPORT_PLACEHOLDER_NAME),
        correspondent: field(4),
        status: resolve_status_token(field(5).as_str()),
        note: field(6),
    }
}

fn find_header(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|line| HEADER_MARKERS.iter().all(|marker| line.contains(marker)))
}

fn parse_meta_block(lines: &[&str]) -> CaseMeta {
    let mut meta = CaseMeta::default();
    for line in lines {
        let parts = line.split(CSV_DELIMITER).collect::<Vec<_>>();
        if parts.len() < 2 {
            continue;
        }
        let label = parts[0].trim().to_lowercase();
        let label = label.strip_suffix(':').unwrap_or(label.as_str()).trim();
        let Some(field) = META_LABELS
            .into_iter()
            .find(|(known, _)| known.to_lowercase() == label)
            .map(|(_, field)| field)
        else {
            continue;
        };
        *meta.field_mut(field) = parts[1..].join(";").trim().to_string();
    }
    meta
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(CSV_DELIMITER)
        .map(|raw| {
            QUOTE_EDGES_RE
                .replace_all(raw.trim(), "")
                .replace("\"\"", "\"")
        })
        .collect()
}

fn export_row(record: &ChronologyRecord) -> String {
    [
        record.id.as_str(),
        record.date.as_str(),
        record.reg_no.as_str(),
        record.name.as_str(),
        record.correspondent.as_str(),
        record.status.label(),
        record.note.as_str(),
    ]
    .iter()
    .map(|value| quote_field(value))
    .collect::<Vec<_>>()
    .join(";")
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn meta_value(meta: &CaseMeta, field: MetaField) -> &str {
    match field {
        MetaField::Title => meta.title.as_str(),
        MetaField::Applicant => meta.applicant.as_str(),
        MetaField::Addressee => meta.addressee.as_str(),
        MetaField::CaseId => meta.case_id.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::{find_header, parse_meta_block, quote_field, split_fields};

    #[test]
    fn split_fields_strips_quotes_and_undoubles() {
        let fields = split_fields(r#" "a" ; "say ""hi""" ;plain; "" "#);
        assert_eq!(fields, vec!["a", "say \"hi\"", "plain", ""]);
    }

    #[test]
    fn quote_field_doubles_inner_quotes() {
        assert_eq!(quote_field(r#"ООО "Ромашка""#), r#""ООО ""Ромашка""""#);
    }

    #[test]
    fn header_scan_is_limited_to_first_twenty_lines() {
        let mut lines = vec!["filler"; 20];
        lines.push("ID;Дата;Статус");
        assert_eq!(find_header(&lines), None);

        lines.remove(0);
        assert_eq!(find_header(&lines), Some(19));
    }

    #[test]
    fn meta_block_matches_labels_case_insensitively_and_rejoins_values() {
        let meta = parse_meta_block(&[
            "ДЕЛО:;Иск; часть 2",
            " номер ;A40-1",
            "Неизвестно:;x",
            "Заявитель:",
        ]);
        assert_eq!(meta.title, "Иск; часть 2");
        assert_eq!(meta.case_id, "A40-1");
        assert!(meta.applicant.is_empty());
        assert!(meta.addressee.is_empty());
    }
}
