//! SQLite store implementation.
//!
//! Holds two pools against the same database file: a write pool used only by
//! the detection-ingestion path, and a read pool whose connections run with
//! `PRAGMA query_only = ON`. The read-only pragma is defense in depth; the
//! safety validator remains the primary boundary for generated SQL.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use tracing::{debug, warn};

use crate::db::{ColumnInfo, QueryResult, Row, StoreClient, Value};
use crate::error::{Result, StocklensError};

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum rows to return from a query.
const MAX_ROWS: usize = 1000;

/// SQLite inventory store.
#[derive(Debug)]
pub struct SqliteStore {
    write_pool: SqlitePool,
    read_pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the store at the given path.
    ///
    /// The write pool is opened first so the schema exists before the
    /// read-only pool connects.
    pub async fn open(path: &Path) -> Result<Self> {
        let write_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let write_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await
            .map_err(|e| StocklensError::store(format!("Failed to open {}: {e}", path.display())))?;

        init_schema(&write_pool).await?;

        let read_opts = SqliteConnectOptions::new()
            .filename(path)
            .pragma("query_only", "ON");

        let read_pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(read_opts)
            .await
            .map_err(|e| {
                StocklensError::store(format!(
                    "Failed to open read-only session on {}: {e}",
                    path.display()
                ))
            })?;

        debug!(path = %path.display(), "Opened inventory store");

        Ok(Self {
            write_pool,
            read_pool,
        })
    }

    /// Closes both pools.
    pub async fn close(&self) {
        self.read_pool.close().await;
        self.write_pool.close().await;
    }
}

/// Creates the inventory relations if they do not exist.
async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_current (
            item_name TEXT PRIMARY KEY,
            stock_count INTEGER,
            last_updated TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StocklensError::store(format!("Failed to create inventory_current: {e}")))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT,
            image_id TEXT,
            item_name TEXT,
            count INTEGER
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StocklensError::store(format!("Failed to create inventory_log: {e}")))?;

    Ok(())
}

#[async_trait]
impl StoreClient for SqliteStore {
    async fn record_detection(&self, image_id: &str, counts: &[(String, u32)]) -> Result<()> {
        // One timestamp per batch so log rows and the snapshot agree.
        let timestamp = Utc::now().to_rfc3339();

        let mut tx = self
            .write_pool
            .begin()
            .await
            .map_err(|e| StocklensError::store(format!("Failed to begin transaction: {e}")))?;

        for (item_name, count) in counts {
            sqlx::query(
                "INSERT INTO inventory_log (timestamp, image_id, item_name, count) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&timestamp)
            .bind(image_id)
            .bind(item_name)
            .bind(*count as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| StocklensError::store(format!("Failed to append log entry: {e}")))?;

            sqlx::query(
                "INSERT OR REPLACE INTO inventory_current (item_name, stock_count, last_updated) \
                 VALUES (?, ?, ?)",
            )
            .bind(item_name)
            .bind(*count as i64)
            .bind(&timestamp)
            .execute(&mut *tx)
            .await
            .map_err(|e| StocklensError::store(format!("Failed to update snapshot: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StocklensError::store(format!("Failed to commit detection batch: {e}")))?;

        debug!(image_id, items = counts.len(), "Recorded detection batch");
        Ok(())
    }

    async fn current_inventory(&self) -> Result<QueryResult> {
        self.execute_read_only("SELECT item_name, stock_count, last_updated FROM inventory_current ORDER BY item_name")
            .await
    }

    async fn recent_log(&self, limit: u32) -> Result<QueryResult> {
        self.execute_read_only(&format!(
            "SELECT id, timestamp, image_id, item_name, count FROM inventory_log \
             ORDER BY timestamp DESC LIMIT {limit}"
        ))
        .await
    }

    async fn execute_read_only(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::query(sql).fetch_all(&self.read_pool),
        )
        .await
        .map_err(|_| {
            StocklensError::query(format!("Query timed out after {QUERY_TIMEOUT_SECS} seconds"))
        })?
        .map_err(format_query_error)?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let total_rows = result.len();
        let was_truncated = total_rows > MAX_ROWS;
        if was_truncated {
            warn!(
                "Query returned {} rows, truncating to {} rows",
                total_rows, MAX_ROWS
            );
        }

        let rows: Vec<Row> = result.iter().take(MAX_ROWS).map(convert_row).collect();
        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
            total_rows: Some(total_rows),
            was_truncated,
        })
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a SqliteRow to our Value type.
///
/// SQLite columns are dynamically typed and expression columns carry no
/// declared type, so unknown names fall through to decode attempts in
/// storage-class order.
fn convert_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        "TEXT" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),

        _ => {
            if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(index) {
                Value::Int(v)
            } else if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(index) {
                Value::Float(v)
            } else if let Ok(Some(v)) = row.try_get::<Option<String>, _>(index) {
                Value::String(v)
            } else if let Ok(Some(v)) = row.try_get::<Option<Vec<u8>>, _>(index) {
                Value::Bytes(v)
            } else {
                Value::Null
            }
        }
    }
}

/// Formats an execution error with the engine message when available.
fn format_query_error(error: sqlx::Error) -> StocklensError {
    if let Some(db_error) = error.as_database_error() {
        StocklensError::query(db_error.message().to_string())
    } else {
        StocklensError::query(error.to_string())
    }
}
