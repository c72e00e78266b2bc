use chronology_core::{
    apply_query, CaseStatus, ChronologyRecord, RecordId, RecordQuery, SortDirection, SortKey,
    SortState,
};

fn record(id: &str, date: &str, name: &str, correspondent: &str) -> ChronologyRecord {
    ChronologyRecord {
        id: RecordId::new(id),
        date: date.to_string(),
        reg_no: String::new(),
        name: name.to_string(),
        correspondent: correspondent.to_string(),
        status: CaseStatus::Created,
        note: String::new(),
    }
}

fn ids(view: &[&ChronologyRecord]) -> Vec<String> {
    view.iter().map(|record| record.id.to_string()).collect()
}

#[test]
fn default_query_sorts_by_date_descending() {
    let records = vec![
        record("r1", "2024-01-10", "a", "x"),
        record("r2", "2024-03-01", "b", "x"),
        record("r3", "2023-12-31", "c", "x"),
    ];

    let view = apply_query(&records, &RecordQuery::default());
    assert_eq!(ids(&view), vec!["r2", "r1", "r3"]);
}

#[test]
fn search_matches_any_field_case_insensitively() {
    let records = vec![
        record("r1", "2024-01-10", "Ходатайство", "Суд"),
        record("r2", "2024-01-11", "Жалоба", "Иванова"),
    ];

    let view = apply_query(&records, &RecordQuery::new("ИВАНО"));
    assert_eq!(ids(&view), vec!["r2"]);

    let view = apply_query(&records, &RecordQuery::new("ивано"));
    assert_eq!(ids(&view), vec!["r2"]);
}

#[test]
fn search_covers_date_status_code_and_id() {
    let mut records = vec![
        record("alpha-1", "2024-05-01", "a", "x"),
        record("beta-2", "2023-02-02", "b", "y"),
    ];
    records[1].status = CaseStatus::Satisfied;

    assert_eq!(ids(&apply_query(&records, &RecordQuery::new("2024-05"))), vec!["alpha-1"]);
    assert_eq!(ids(&apply_query(&records, &RecordQuery::new("SATIS"))), vec!["beta-2"]);
    assert_eq!(ids(&apply_query(&records, &RecordQuery::new("beta"))), vec!["beta-2"]);
}

#[test]
fn search_without_hits_returns_empty_view() {
    let records = vec![record("r1", "2024-01-10", "a", "x")];
    assert!(apply_query(&records, &RecordQuery::new("nothing")).is_empty());
}

#[test]
fn equal_keys_keep_store_order_in_both_directions() {
    let records = vec![
        record("r1", "2024-01-01", "a", "same"),
        record("r2", "2024-01-02", "b", "same"),
        record("r3", "2024-01-03", "c", "other"),
    ];

    let asc = RecordQuery::default().sorted_by(SortKey::Correspondent, SortDirection::Asc);
    assert_eq!(ids(&apply_query(&records, &asc)), vec!["r3", "r1", "r2"]);

    let desc = RecordQuery::default().sorted_by(SortKey::Correspondent, SortDirection::Desc);
    assert_eq!(ids(&apply_query(&records, &desc)), vec!["r1", "r2", "r3"]);
}

#[test]
fn toggle_flips_same_key_and_resets_on_new_key() {
    let mut sort = SortState::new(SortKey::Date, SortDirection::Asc);

    sort.toggle(SortKey::Date);
    assert_eq!(sort, SortState::new(SortKey::Date, SortDirection::Desc));

    sort.toggle(SortKey::Date);
    assert_eq!(sort, SortState::new(SortKey::Date, SortDirection::Asc));

    sort.toggle(SortKey::Date);
    sort.toggle(SortKey::Name);
    assert_eq!(sort, SortState::new(SortKey::Name, SortDirection::Asc));
}

#[test]
fn toggled_sort_reorders_view() {
    let records = vec![
        record("r1", "2024-01-10", "a", "x"),
        record("r2", "2024-03-01", "b", "x"),
    ];
    let mut query = RecordQuery::default().sorted_by(SortKey::Date, SortDirection::Asc);
    assert_eq!(ids(&apply_query(&records, &query)), vec!["r1", "r2"]);

    query.sort.toggle(SortKey::Date);
    assert_eq!(ids(&apply_query(&records, &query)), vec!["r2", "r1"]);
}
