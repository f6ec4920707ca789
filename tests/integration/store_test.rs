//! Inventory store integration tests.
//!
//! Exercise schema bootstrap, the ingestion path, the read-only session, and
//! shape-rewrite equivalence against real SQLite files.

use stocklens::db::{SqliteStore, StoreClient, Value};
use stocklens::query::rewrite;
use tempfile::TempDir;

/// Opens a fresh store in a temp directory. The TempDir must stay alive for
/// the duration of the test.
async fn open_test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(&dir.path().join("inventory.db"))
        .await
        .expect("open store");
    (store, dir)
}

#[tokio::test]
async fn test_record_detection_appends_log_and_upserts_current() {
    let (store, _dir) = open_test_store().await;

    store
        .record_detection(
            "img_1",
            &[("Sprite".to_string(), 12), ("Pepsi".to_string(), 15)],
        )
        .await
        .unwrap();
    store
        .record_detection("img_2", &[("Sprite".to_string(), 4)])
        .await
        .unwrap();

    // One snapshot row per label, holding the latest count.
    let current = store.current_inventory().await.unwrap();
    assert_eq!(current.row_count, 2);
    let sprite_row = current
        .rows
        .iter()
        .find(|r| r[0] == Value::String("Sprite".to_string()))
        .expect("Sprite row");
    assert_eq!(sprite_row[1], Value::Int(4));

    // One log row per (label, count) observation.
    let log = store
        .execute_read_only("SELECT COUNT(*) AS n FROM inventory_log")
        .await
        .unwrap();
    assert_eq!(log.rows[0][0], Value::Int(3));
}

#[tokio::test]
async fn test_recent_log_is_bounded_and_newest_first() {
    let (store, _dir) = open_test_store().await;

    for i in 0..5 {
        store
            .record_detection(&format!("img_{i}"), &[("Kinley".to_string(), 10 + i)])
            .await
            .unwrap();
    }

    let log = store.recent_log(3).await.unwrap();
    assert_eq!(log.row_count, 3);

    // Timestamps are ISO-8601 text; descending order.
    let timestamps: Vec<String> = log
        .rows
        .iter()
        .map(|r| r[1].to_display_string())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_read_only_session_rejects_writes() {
    let (store, _dir) = open_test_store().await;

    let result = store
        .execute_read_only("INSERT INTO inventory_log (timestamp, image_id, item_name, count) VALUES ('t', 'i', 'x', 1)")
        .await;

    // The query_only pragma holds even if mutating SQL reaches the session.
    let err = result.unwrap_err();
    assert_eq!(err.category(), "Query Error");
}

#[tokio::test]
async fn test_execute_read_only_converts_values() {
    let (store, _dir) = open_test_store().await;

    store
        .record_detection("img_1", &[("ThumbsUp".to_string(), 18)])
        .await
        .unwrap();

    let result = store
        .execute_read_only(
            "SELECT item_name, stock_count, last_updated FROM inventory_current",
        )
        .await
        .unwrap();

    assert_eq!(result.row_count, 1);
    assert_eq!(result.columns.len(), 3);
    assert_eq!(result.rows[0][0], Value::String("ThumbsUp".to_string()));
    assert_eq!(result.rows[0][1], Value::Int(18));
    assert!(matches!(result.rows[0][2], Value::String(_)));
}

#[tokio::test]
async fn test_execute_read_only_empty_result_is_ok() {
    let (store, _dir) = open_test_store().await;

    let result = store
        .execute_read_only("SELECT * FROM inventory_current WHERE stock_count < 0")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.row_count, 0);
}

#[tokio::test]
async fn test_engine_error_is_query_error() {
    let (store, _dir) = open_test_store().await;

    let err = store
        .execute_read_only("SELECT nope FROM inventory_current")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Query Error");
    assert!(err.to_string().contains("nope"));
}

#[tokio::test]
async fn test_rewritten_window_query_matches_handwritten_equivalent() {
    let (store, _dir) = open_test_store().await;

    store
        .record_detection("img_1", &[("Sprite".to_string(), 5)])
        .await
        .unwrap();
    store
        .record_detection("img_2", &[("Sprite".to_string(), 9), ("Pepsi".to_string(), 7)])
        .await
        .unwrap();

    let generated = "SELECT item_name, count, LAG(count) OVER (PARTITION BY item_name ORDER BY id) AS prev \
                     FROM inventory_log WHERE item_name = 'Sprite';";
    let rewritten = rewrite(generated);
    assert!(rewritten.starts_with("WITH base AS ("));

    let handwritten = "SELECT item_name, count, prev FROM ( \
                           SELECT item_name, count, LAG(count) OVER (PARTITION BY item_name ORDER BY id) AS prev \
                           FROM inventory_log) \
                       WHERE item_name = 'Sprite' ORDER BY count;";

    let mut rewritten_rows = store
        .execute_read_only(&rewritten)
        .await
        .unwrap()
        .rows;
    rewritten_rows.sort_by_key(|r| match &r[1] {
        Value::Int(n) => *n,
        _ => i64::MAX,
    });
    let handwritten_rows = store.execute_read_only(handwritten).await.unwrap().rows;

    assert_eq!(rewritten_rows, handwritten_rows);
    assert_eq!(rewritten_rows.len(), 2);
}
