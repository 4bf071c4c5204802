use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use talos::{
    core::{decoder::decode_text, history::HistoryStore},
    persist::{sqlite::SqliteStorage, HistoryStorage},
};

fn at(i: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 29)
        .expect("date")
        .and_hms_opt(23, 59, 0)
        .expect("time")
        + Duration::seconds(i)
}

#[test]
fn sqlite_history_survives_reopen_in_order() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("history.db");

    let mut store = HistoryStore::new(SqliteStorage::open(&db_path).expect("open sqlite"));
    for (i, text) in ["41 42 43", "plain", "C3 A9 74 C3 A9"].iter().enumerate() {
        assert!(store.append_at(&decode_text(text), at(i as i64)).saved);
    }
    let written = store.load_all();
    drop(store);

    let reopened = SqliteStorage::open(&db_path).expect("reopen");
    assert_eq!(reopened.len().expect("len"), 3);
    let loaded = reopened.load().expect("load");
    assert_eq!(loaded, written);
    assert_eq!(loaded[2].decoded, "été");
}

#[test]
fn sqlite_delete_and_eviction_rewrite_collection() {
    let mut store = HistoryStore::with_config(
        SqliteStorage::open_in_memory().expect("open"),
        talos::core::history::HistoryConfig { max_entries: 3 },
    );

    let mut entries = Vec::new();
    for i in 0..4 {
        entries.push(store.append_at(&decode_text(&format!("item {i}")), at(i)).entry);
    }
    assert_eq!(store.count(), 3);

    assert!(store.delete(&entries[2]));
    assert!(!store.delete(&entries[0]));

    let originals: Vec<String> = store.load_all().into_iter().map(|e| e.original).collect();
    assert_eq!(originals, vec!["item 1", "item 3"]);
    assert!(!store.storage().is_empty().expect("is_empty"));
}
