//! Store abstraction layer for Stocklens.
//!
//! Provides a trait-based interface for the inventory store, allowing the
//! SQLite backend and test doubles to be used interchangeably.

mod mock;
mod schema;
mod sqlite;
mod types;

pub use mock::{FailingStoreClient, MockStoreClient};
pub use schema::{Column, Relation, SchemaDescriptor, SemanticType};
pub use sqlite::SqliteStore;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for the inventory store.
///
/// Writes go only through [`StoreClient::record_detection`]; the
/// question-answering pipeline uses [`StoreClient::execute_read_only`]
/// exclusively.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Records one detection batch: appends to the log and upserts the
    /// current-stock snapshot, in a single transaction.
    async fn record_detection(&self, image_id: &str, counts: &[(String, u32)]) -> Result<()>;

    /// Returns the full current-stock relation.
    async fn current_inventory(&self) -> Result<QueryResult>;

    /// Returns the most recent log entries, newest first.
    async fn recent_log(&self, limit: u32) -> Result<QueryResult>;

    /// Executes a validated query in a read-only session.
    ///
    /// The session is acquired only for the duration of this call.
    async fn execute_read_only(&self, sql: &str) -> Result<QueryResult>;
}
