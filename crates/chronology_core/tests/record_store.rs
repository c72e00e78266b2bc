use chronology_core::{
    CaseMeta, CaseStatus, DraftValidationError, KeyValueStore, MemoryKeyValueStore, MetaField,
    PendingActionKind, RecordDraft, RecordId, RecordQuery, RecordStore, StoreConfig, StoreError,
    StoreEvent,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;

fn draft(date: &str, name: &str, correspondent: &str, status: CaseStatus) -> RecordDraft {
    let mut draft = RecordDraft::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    draft.date = date.to_string();
    draft.name = name.to_string();
    draft.correspondent = correspondent.to_string();
    draft.status = status;
    draft
}

fn simple(name: &str) -> RecordDraft {
    draft("2024-02-01", name, "Суд", CaseStatus::Created)
}

#[test]
fn new_draft_uses_given_day_and_default_status() {
    let draft = RecordDraft::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    assert_eq!(draft.date, "2024-03-09");
    assert_eq!(draft.status, CaseStatus::Created);
    assert!(draft.name.is_empty());
}

#[test]
fn create_assigns_unique_ids_and_persists() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();

    let first = store.create(simple("Иск")).unwrap();
    let second = store.create(simple("Иск")).unwrap();

    assert_ne!(first, second);
    assert_eq!(store.records().len(), 2);
    assert_eq!(store.get(&first).unwrap().status, CaseStatus::Created);

    let stored = kv.get("chronos_records").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["regNo"], "");
    assert_eq!(json[0]["status"], "created");
}

#[test]
fn create_rejects_invalid_drafts_without_mutating() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();

    let err = store
        .create(draft("01.02.2024", "Иск", "Суд", CaseStatus::Created))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(DraftValidationError::InvalidDate(_))
    ));

    let err = store
        .create(draft("2024-02-01", "  ", "Суд", CaseStatus::Created))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(DraftValidationError::EmptyName)
    ));

    assert!(store.records().is_empty());
    assert!(kv.is_empty());
}

#[test]
fn update_replaces_fields_and_preserves_id() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    let id = store.create(simple("Иск")).unwrap();

    let mut edit = RecordDraft::from_record(store.get(&id).unwrap());
    edit.name = "Уточнённый иск".to_string();
    edit.status = CaseStatus::Sent;
    edit.note = "курьером".to_string();
    assert!(store.update(&id, edit).unwrap());

    let updated = store.get(&id).unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Уточнённый иск");
    assert_eq!(updated.status, CaseStatus::Sent);
    assert_eq!(updated.note, "курьером");
    assert_eq!(store.records().len(), 1);
}

#[test]
fn update_and_delete_with_unknown_id_are_silent_noops() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store.create(simple("Иск")).unwrap();

    let missing = RecordId::new("missing-id");
    assert!(!store.update(&missing, simple("x")).unwrap());
    assert!(!store.delete(&missing).unwrap());
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].name, "Иск");
}

#[test]
fn delete_removes_only_matching_record() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    let keep = store.create(simple("keep")).unwrap();
    let drop = store.create(simple("drop")).unwrap();

    assert!(store.delete(&drop).unwrap());
    assert!(store.get(&drop).is_none());
    assert!(store.get(&keep).is_some());

    let reopened = RecordStore::open(&kv).unwrap();
    assert_eq!(reopened.records().len(), 1);
    assert_eq!(reopened.records()[0].id, keep);
}

#[test]
fn stats_follow_status_counts() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    assert_eq!(store.stats().efficiency, 0);

    for status in [
        CaseStatus::Satisfied,
        CaseStatus::Satisfied,
        CaseStatus::Satisfied,
        CaseStatus::Rejected,
        CaseStatus::Processing,
    ] {
        store
            .create(draft("2024-02-01", "doc", "Суд", status))
            .unwrap();
    }

    let stats = store.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.final_success, 3);
    assert_eq!(stats.fail, 1);
    assert_eq!(stats.closed, 4);
    assert_eq!(stats.efficiency, 75);

    let ignored = store.records()[4].id.clone();
    store
        .update(&ignored, draft("2024-02-01", "doc", "Суд", CaseStatus::Ignored))
        .unwrap();
    let stats = store.stats();
    assert_eq!(stats.fail, 2);
    assert_eq!(stats.efficiency, 60);
}

#[test]
fn meta_edits_persist_and_reload() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store.set_meta_field(MetaField::Title, "Иск о взыскании").unwrap();
    store.set_meta_field(MetaField::CaseId, "А40-123/2024").unwrap();

    let reopened = RecordStore::open(&kv).unwrap();
    assert_eq!(reopened.meta().title, "Иск о взыскании");
    assert_eq!(reopened.meta().case_id, "А40-123/2024");

    let stored = kv.get("chronos_meta").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(json["caseId"], "А40-123/2024");
}

#[test]
fn reset_clears_data_and_snapshot_but_keeps_warning_flag() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store
        .set_meta(CaseMeta {
            title: "Дело".to_string(),
            ..CaseMeta::default()
        })
        .unwrap();
    store.create(simple("Иск")).unwrap();
    store.dismiss_warning().unwrap();

    store.reset().unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.meta(), &CaseMeta::default());
    assert!(kv.get("chronos_records").unwrap().is_none());
    assert!(kv.get("chronos_meta").unwrap().is_none());
    assert!(store.warning_dismissed().unwrap());
}

#[test]
fn warning_flag_defaults_to_not_dismissed() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::open(&kv).unwrap();
    assert!(!store.warning_dismissed().unwrap());
    store.dismiss_warning().unwrap();
    assert!(RecordStore::open(&kv).unwrap().warning_dismissed().unwrap());
}

#[test]
fn open_loads_snapshot_with_unknown_status_as_default() {
    let kv = MemoryKeyValueStore::new();
    kv.set(
        "chronos_records",
        r#"[{"id":"_abc123","date":"2024-01-05","regNo":"17","name":"Запрос","correspondent":"ФНС","status":"weird","note":""}]"#,
    )
    .unwrap();
    kv.set(
        "chronos_meta",
        r#"{"title":"T","applicant":"A","addressee":"B","caseId":"C"}"#,
    )
    .unwrap();

    let store = RecordStore::open(&kv).unwrap();
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].status, CaseStatus::Created);
    assert_eq!(store.records()[0].reg_no, "17");
    assert_eq!(store.meta().case_id, "C");
}

#[test]
fn open_reports_corrupt_snapshot() {
    let kv = MemoryKeyValueStore::new();
    kv.set("chronos_records", "not json").unwrap();

    let err = RecordStore::open(&kv).err().unwrap();
    assert!(err.to_string().contains("chronos_records"));
}

#[test]
fn custom_key_prefix_isolates_datasets() {
    let kv = MemoryKeyValueStore::new();
    let mut first = RecordStore::open_with_config(&kv, StoreConfig::with_key_prefix("a")).unwrap();
    first.create(simple("Иск")).unwrap();

    let second = RecordStore::open_with_config(&kv, StoreConfig::with_key_prefix("b")).unwrap();
    assert!(second.records().is_empty());
    assert!(kv.get("a_records").unwrap().is_some());
}

#[test]
fn confirm_executes_delete_and_clears_pending() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    let id = store.create(simple("Иск")).unwrap();

    let pending = store.request_delete(id.clone());
    assert_eq!(pending.target(), Some(&id));
    assert_eq!(pending.title, "Удаление записи");

    let executed = store.confirm().unwrap();
    assert_eq!(executed, Some(PendingActionKind::DeleteOne(id)));
    assert!(store.records().is_empty());
    assert!(store.pending_action().is_none());
    assert_eq!(store.confirm().unwrap(), None);
}

#[test]
fn cancel_clears_pending_without_executing() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store.create(simple("Иск")).unwrap();

    store.request_clear_all();
    let cancelled = store.cancel().unwrap();
    assert_eq!(cancelled.kind, PendingActionKind::ClearAll);
    assert!(store.pending_action().is_none());
    assert_eq!(store.records().len(), 1);
}

#[test]
fn confirm_clear_all_resets_store() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store.create(simple("Иск")).unwrap();

    store.request_clear_all();
    assert_eq!(store.confirm().unwrap(), Some(PendingActionKind::ClearAll));
    assert!(store.records().is_empty());
    assert!(store.pending_action().is_none());
}

#[test]
fn subscribers_see_applied_changes_only() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let id = store.create(simple("Иск")).unwrap();
    store.delete(&RecordId::new("missing")).unwrap();
    store.delete(&id).unwrap();
    store.reset().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            StoreEvent::RecordCreated(id.clone()),
            StoreEvent::RecordDeleted(id),
            StoreEvent::Reset,
        ]
    );

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.create(simple("после")).unwrap();
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn view_applies_query_to_store_contents() {
    let kv = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(&kv).unwrap();
    store
        .create(draft("2024-01-01", "Ходатайство", "Суд", CaseStatus::Created))
        .unwrap();
    store
        .create(draft("2024-02-01", "Жалоба", "Иванова", CaseStatus::Created))
        .unwrap();

    let view = store.view(&RecordQuery::new("ивано"));
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].name, "Жалоба");
}
