//! Mock store clients for testing.
//!
//! Provide in-memory stand-ins so pipeline behavior can be tested without a
//! database file.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ColumnInfo, QueryResult, StoreClient, Value};
use crate::error::{Result, StocklensError};

/// A mock store client that returns a scripted result and records every
/// query it is asked to execute.
#[derive(Debug, Default)]
pub struct MockStoreClient {
    scripted: Option<QueryResult>,
    executed: Mutex<Vec<String>>,
}

impl MockStoreClient {
    /// Creates a new mock store with a default one-row result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store that returns the given result for every query.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            scripted: Some(result),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the queries executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn default_result(sql: &str) -> QueryResult {
        QueryResult {
            columns: vec![ColumnInfo::new("result", "TEXT")],
            rows: vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            execution_time: Duration::from_millis(1),
            row_count: 1,
            total_rows: Some(1),
            was_truncated: false,
        }
    }
}

#[async_trait]
impl StoreClient for MockStoreClient {
    async fn record_detection(&self, _image_id: &str, _counts: &[(String, u32)]) -> Result<()> {
        Ok(())
    }

    async fn current_inventory(&self) -> Result<QueryResult> {
        self.execute_read_only("SELECT item_name, stock_count, last_updated FROM inventory_current")
            .await
    }

    async fn recent_log(&self, limit: u32) -> Result<QueryResult> {
        self.execute_read_only(&format!("SELECT * FROM inventory_log LIMIT {limit}"))
            .await
    }

    async fn execute_read_only(&self, sql: &str) -> Result<QueryResult> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(self
            .scripted
            .clone()
            .unwrap_or_else(|| Self::default_result(sql)))
    }
}

/// A store client whose read path always fails with an engine-style error.
///
/// Models the "generator produced SQL the engine cannot run" case.
#[derive(Debug, Clone)]
pub struct FailingStoreClient {
    message: String,
}

impl FailingStoreClient {
    /// Creates a failing store with the given engine message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingStoreClient {
    fn default() -> Self {
        Self::new("no such column: unknown_column")
    }
}

#[async_trait]
impl StoreClient for FailingStoreClient {
    async fn record_detection(&self, _image_id: &str, _counts: &[(String, u32)]) -> Result<()> {
        Ok(())
    }

    async fn current_inventory(&self) -> Result<QueryResult> {
        Err(StocklensError::query(self.message.clone()))
    }

    async fn recent_log(&self, _limit: u32) -> Result<QueryResult> {
        Err(StocklensError::query(self.message.clone()))
    }

    async fn execute_read_only(&self, _sql: &str) -> Result<QueryResult> {
        Err(StocklensError::query(self.message.clone()))
    }
}
