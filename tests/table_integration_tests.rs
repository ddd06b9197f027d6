// ============================================================================
// Integration Tests for table selection, querying and mutation
// ============================================================================
//
// Every test works against a fresh temporary root directory through the
// public FileDb / Database / TableHandle API.
//
// ============================================================================

use rustfiledb::{Database, DbError, Direction, FileDb, FileDbConfig, Record};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn setup() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db = FileDb::at(temp_dir.path()).unwrap();
    let app = db.create_database("app").unwrap();
    (temp_dir, app)
}

fn as_values(records: &[Record]) -> Vec<Value> {
    records.iter().cloned().map(Value::Object).collect()
}

fn column(records: &[Record], field: &str) -> Vec<Value> {
    records.iter().map(|r| r[field].clone()).collect()
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn test_missing_table_is_empty() {
    let (_dir, app) = setup();
    let mut users = app.table("users").unwrap();
    assert!(users.all(None).unwrap().is_empty());
    assert!(!app.has_table("users").unwrap());
}

#[test]
fn test_unknown_database_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let db = FileDb::at(temp_dir.path()).unwrap();
    let err = db.open("nope").unwrap_err();
    assert!(matches!(err, DbError::ConfigurationError(_)));
}

#[test]
fn test_bad_table_name() {
    let (_dir, app) = setup();
    assert!(matches!(app.table("../users"), Err(DbError::ConfigurationError(_))));
}

#[test]
fn test_malformed_table_file() {
    let (_dir, app) = setup();
    fs::write(app.path().join("users.json"), r#"{"id": 1}"#).unwrap();
    assert!(matches!(app.table("users"), Err(DbError::MalformedData { .. })));
}

// ============================================================================
// INSERT / GET
// ============================================================================

#[test]
fn test_insert_then_get_round_trip() {
    let (_dir, app) = setup();
    let mut users = app.table("users").unwrap();

    let id = users.insert(json!({"name": "a"})).unwrap();
    let record = users.filter("id", "=", id).unwrap().get().unwrap();
    assert_eq!(Value::Object(record), json!({"id": id, "name": "a"}));

    // a fresh selection sees the same record
    let mut reloaded = app.table("users").unwrap();
    assert_eq!(reloaded.filter("id", "=", id).unwrap().first().unwrap()["name"], json!("a"));
}

#[test]
fn test_ids_are_sequential() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();

    let ids: Vec<u64> = (0..10).map(|n| items.insert(json!({"n": n})).unwrap()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());

    let all = app.table("items").unwrap().all(None).unwrap();
    assert_eq!(column(&all, "id"), (1..=10).map(|i| json!(i)).collect::<Vec<_>>());
}

#[test]
fn test_nested_values_round_trip() {
    let (_dir, app) = setup();
    let mut docs = app.table("docs").unwrap();
    let payload = json!({"tags": ["a", "b"], "meta": {"x": null, "y": [1, 2.5]}, "ok": true});
    let id = docs.insert(payload.clone()).unwrap();

    let stored = app.table("docs").unwrap().get().unwrap();
    assert_eq!(stored["id"], json!(id));
    assert_eq!(stored["tags"], payload["tags"]);
    assert_eq!(stored["meta"], payload["meta"]);
    assert_eq!(stored["ok"], json!(true));
}

// ============================================================================
// UPDATE / DELETE
// ============================================================================

#[test]
fn test_update_without_filter_leaves_file_untouched() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    items.insert(json!({"a": 1})).unwrap();

    let path = items.path().to_path_buf();
    let content_before = fs::read(&path).unwrap();
    let modified_before = fs::metadata(&path).unwrap().modified().unwrap();

    let err = items.update(json!({"a": 2})).unwrap_err();
    assert!(matches!(err, DbError::MissingFilter(_)));
    assert_eq!(fs::read(&path).unwrap(), content_before);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified_before);
}

#[test]
fn test_partial_merge() {
    let (_dir, app) = setup();
    fs::write(app.path().join("items.json"), r#"[{"id": 1, "a": 1, "b": 2}]"#).unwrap();

    let mut items = app.table("items").unwrap();
    let affected = items.filter("id", "=", 1).unwrap().update(json!({"b": 9})).unwrap();
    assert_eq!(affected, 1);

    let record = app.table("items").unwrap().get().unwrap();
    assert_eq!(Value::Object(record), json!({"id": 1, "a": 1, "b": 9}));
}

#[test]
fn test_update_id_is_always_rejected() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    items.insert(json!({"a": 1})).unwrap();

    assert!(matches!(items.update(json!({"id": 5})), Err(DbError::ImmutableField(_))));
    let err = items.filter("a", "=", 1).unwrap().update(json!({"id": 5})).unwrap_err();
    assert!(matches!(err, DbError::ImmutableField(_)));
    assert_eq!(app.table("items").unwrap().get().unwrap()["id"], json!(1));
}

#[test]
fn test_update_counts_matches() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    for (name, group) in [("a", "x"), ("b", "y"), ("c", "x")] {
        items.insert(json!({"name": name, "group": group})).unwrap();
    }

    let affected = items.filter("group", "=", "x").unwrap().update(json!({"flag": 1})).unwrap();
    assert_eq!(affected, 2);
    assert_eq!(items.filter("group", "=", "none").unwrap().update(json!({"flag": 2})).unwrap(), 0);

    let flagged = items.filter("name", "!=", "b").unwrap().all(None).unwrap();
    assert_eq!(column(&flagged, "flag"), vec![json!(1), json!(1)]);
}

#[test]
fn test_delete_requires_filter() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    items.insert(json!({"n": 1})).unwrap();
    items.insert(json!({"n": 2})).unwrap();

    assert!(matches!(items.delete(), Err(DbError::MissingFilter(_))));
    assert_eq!(items.filter("n", "=", 1).unwrap().delete().unwrap(), 1);
    assert_eq!(column(&app.table("items").unwrap().all(None).unwrap(), "n"), vec![json!(2)]);
}

// ============================================================================
// QUERYING
// ============================================================================

#[test]
fn test_sort_with_nulls() {
    let (_dir, app) = setup();
    fs::write(
        app.path().join("vals.json"),
        r#"[{"id": 1, "v": null}, {"id": 2, "v": 1}, {"id": 3, "v": null}, {"id": 4, "v": 2}]"#,
    )
    .unwrap();
    let mut vals = app.table("vals").unwrap();

    let asc = vals.order("v", Direction::Asc).unwrap().all(None).unwrap();
    assert_eq!(column(&asc, "v"), vec![json!(null), json!(null), json!(1), json!(2)]);
    assert_eq!(column(&asc, "id"), vec![json!(1), json!(3), json!(2), json!(4)]);

    let desc = vals.order("v", Direction::Desc).unwrap().all(None).unwrap();
    assert_eq!(column(&desc, "v"), vec![json!(2), json!(1), json!(null), json!(null)]);
}

#[test]
fn test_like_filter() {
    let (_dir, app) = setup();
    let mut people = app.table("people").unwrap();
    people.insert(json!({"name": "John"})).unwrap();
    people.insert(json!({"name": "Amy"})).unwrap();

    let found = people.filter("name", "LIKE", "oh").unwrap().all(None).unwrap();
    assert_eq!(column(&found, "name"), vec![json!("John")]);
}

#[test]
fn test_loose_comparisons_through_api() {
    let (_dir, app) = setup();
    let mut people = app.table("people").unwrap();
    people.insert(json!({"name": "a", "age": "5"})).unwrap();
    people.insert(json!({"name": "b", "age": 12})).unwrap();
    people.insert(json!({"name": "c", "age": "30"})).unwrap();

    let eq = people.filter("age", "=", 5).unwrap().all(None).unwrap();
    assert_eq!(column(&eq, "name"), vec![json!("a")]);

    let range = people
        .filter("age", ">", "6")
        .unwrap()
        .filter("age", "<=", 30)
        .unwrap()
        .order("age", Direction::Desc)
        .unwrap()
        .all(None)
        .unwrap();
    assert_eq!(column(&range, "name"), vec![json!("c"), json!("b")]);
}

#[test]
fn test_first_last_and_limit() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    for n in [3, 1, 2] {
        items.insert(json!({"n": n})).unwrap();
    }

    assert_eq!(items.order("n", Direction::Asc).unwrap().first().unwrap()["n"], json!(1));
    assert_eq!(items.order("n", Direction::Asc).unwrap().last().unwrap()["n"], json!(3));
    assert_eq!(items.last().unwrap()["n"], json!(2));
    assert_eq!(items.all(Some(2)).unwrap().len(), 2);
    assert_eq!(items.all(Some(0)).unwrap().len(), 3);
    assert!(matches!(items.filter("n", ">", 10).unwrap().get(), Err(DbError::NotFound)));
    assert_eq!(items.count().unwrap(), 3);
}

#[test]
fn test_query_state_never_leaks() {
    let (_dir, app) = setup();
    let mut items = app.table("items").unwrap();
    items.insert(json!({"n": 1})).unwrap();
    items.insert(json!({"n": 2})).unwrap();

    assert!(matches!(items.filter("n", "bogus", 1), Err(DbError::InvalidOperator(_))));
    assert!(matches!(
        items.filter("missing", "=", 1).unwrap().order("n", Direction::Desc).unwrap().all(None),
        Err(DbError::UnknownField(_))
    ));

    let all = items.all(None).unwrap();
    assert_eq!(as_values(&all), vec![json!({"id": 1, "n": 1}), json!({"id": 2, "n": 2})]);
}

#[test]
fn test_pretty_printed_tables_are_readable() {
    let temp_dir = TempDir::new().unwrap();
    let db = FileDb::new(FileDbConfig::new(temp_dir.path()).pretty(true)).unwrap();
    let app = db.create_database("app").unwrap();
    app.table("items").unwrap().insert(json!({"n": 1})).unwrap();

    let text = fs::read_to_string(app.path().join("items.json")).unwrap();
    assert!(text.contains('\n'));
    assert_eq!(app.table("items").unwrap().count().unwrap(), 1);
}
