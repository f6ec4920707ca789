//! End-to-end pipeline tests.
//!
//! Drive the full ask pipeline with mock generators over real SQLite stores,
//! covering the acceptance, rejection, execution-failure, and zero-row paths.

use std::sync::Arc;

use stocklens::db::{MockStoreClient, SchemaDescriptor, SqliteStore, StoreClient};
use stocklens::llm::{MockGenerator, TextGenerator};
use stocklens::pipeline::{AskPipeline, NO_ROWS_SIGNAL};
use tempfile::TempDir;

async fn seeded_store() -> (Arc<SqliteStore>, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(&dir.path().join("inventory.db"))
        .await
        .expect("open store");
    store
        .record_detection("img_1", &[("Sprite".to_string(), 4), ("Pepsi".to_string(), 15)])
        .await
        .expect("seed store");
    (Arc::new(store), dir)
}

fn pipeline(generator: impl TextGenerator + 'static, store: Arc<dyn StoreClient>) -> AskPipeline {
    AskPipeline::new(Box::new(generator), store, SchemaDescriptor::inventory())
}

#[tokio::test]
async fn test_low_stock_question_round_trip() {
    let (store, _dir) = seeded_store().await;
    let generator = MockGenerator::new().with_response(
        "database schema",
        "```sql\nSELECT item_name, stock_count FROM inventory_current WHERE stock_count < 10;\n```",
    );

    let record = pipeline(generator, store).ask("which items are low on stock?").await;

    assert_eq!(
        record.final_query_text.as_deref(),
        Some("SELECT item_name, stock_count FROM inventory_current WHERE stock_count < 10;")
    );
    let sample = record.result_sample.expect("one-row sample");
    assert!(sample.contains("Sprite | 4"));
    assert!(!sample.contains("Pepsi"));
    assert!(!record.answer_text.is_empty());
}

#[tokio::test]
async fn test_drop_statement_is_rejected_before_the_store() {
    let store = Arc::new(MockStoreClient::new());
    let generator =
        MockGenerator::new().with_response("database schema", "DROP TABLE inventory_current;");

    let record = pipeline(generator, Arc::clone(&store) as Arc<dyn StoreClient>)
        .ask("wipe the inventory")
        .await;

    assert!(record.answer_text.contains("Query blocked"));
    assert!(record.answer_text.contains("forbidden operation 'DROP'"));
    assert!(record.answer_text.contains("DROP TABLE inventory_current;"));
    assert!(store.executed_queries().is_empty());
}

#[tokio::test]
async fn test_unknown_column_reaches_terminal_error_string() {
    let (store, _dir) = seeded_store().await;
    let generator = MockGenerator::new().with_response(
        "database schema",
        "```sql\nSELECT stok_count FROM inventory_current;\n```",
    );

    let record = pipeline(generator, store).ask("how much stock?").await;

    assert!(record
        .answer_text
        .contains("The generated query could not be executed"));
    assert!(record.answer_text.contains("SELECT stok_count"));
    assert!(record.result_sample.is_none());
}

#[tokio::test]
async fn test_zero_row_result_synthesizes_over_no_rows_signal() {
    let (store, _dir) = seeded_store().await;
    let generator = MockGenerator::new().with_response(
        "database schema",
        "```sql\nSELECT item_name FROM inventory_current WHERE stock_count < 0;\n```",
    );

    let record = pipeline(generator, store).ask("anything below zero?").await;

    assert_eq!(record.result_sample.as_deref(), Some(NO_ROWS_SIGNAL));
    assert!(!record.answer_text.is_empty());
}

#[tokio::test]
async fn test_second_statement_is_dropped_by_sanitizer() {
    let (store, _dir) = seeded_store().await;
    let generator = MockGenerator::new().with_response(
        "database schema",
        "SELECT item_name FROM inventory_current; DROP TABLE inventory_current;",
    );

    let record = pipeline(generator, Arc::clone(&store) as Arc<dyn StoreClient>)
        .ask("list the items")
        .await;

    assert_eq!(
        record.final_query_text.as_deref(),
        Some("SELECT item_name FROM inventory_current;")
    );
    assert!(record.result_sample.is_some());

    // The table survived: the mutating second statement never ran.
    let current = store.current_inventory().await.unwrap();
    assert_eq!(current.row_count, 2);
}

#[tokio::test]
async fn test_windowed_query_executes_after_rewrite() {
    let (store, _dir) = seeded_store().await;
    store
        .record_detection("img_2", &[("Sprite".to_string(), 9)])
        .await
        .unwrap();

    let generator = MockGenerator::new().with_response(
        "database schema",
        "```sql\nSELECT item_name, count, LAG(count) OVER (PARTITION BY item_name ORDER BY id) AS prev \
         FROM inventory_log WHERE item_name = 'Sprite';\n```",
    );

    let record = pipeline(generator, store).ask("how did Sprite stock change?").await;

    let sql = record.final_query_text.expect("query text");
    assert!(sql.starts_with("WITH base AS ("));
    let sample = record.result_sample.expect("sample");
    assert!(sample.contains("Sprite"));
}

#[tokio::test]
async fn test_nonsense_generator_output_is_rejected_not_executed() {
    let store = Arc::new(MockStoreClient::new());
    let generator = MockGenerator::new()
        .with_response("database schema", "I cannot answer that question.");

    let record = pipeline(generator, Arc::clone(&store) as Arc<dyn StoreClient>)
        .ask("gibberish")
        .await;

    assert!(record
        .answer_text
        .contains("only SELECT or WITH queries are allowed"));
    assert!(store.executed_queries().is_empty());
}
