//! Verdict-gated query execution.
//!
//! The executor takes the validator's verdict, not raw text: a rejected
//! candidate can never reach the store. Accepted text is shape-rewritten,
//! re-checked, and run in the store's read-only session.

use tracing::{debug, info};

use crate::db::{QueryResult, StoreClient};
use crate::error::StocklensError;
use crate::query::rewrite;
use crate::safety::{validate, RejectReason, ValidationVerdict};

/// Executes validated queries against the store.
pub struct QueryExecutor<'a> {
    store: &'a dyn StoreClient,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(store: &'a dyn StoreClient) -> Self {
        Self { store }
    }

    /// Executes the query carried by an accepted verdict.
    ///
    /// Rejected verdicts pass through untouched. Accepted text is rewritten
    /// for engine compatibility and re-validated before execution; if the
    /// rewrite somehow produced non-read-only text, the request is rejected
    /// rather than executed.
    pub async fn execute(&self, verdict: ValidationVerdict) -> ExecutionResult {
        let text = match verdict {
            ValidationVerdict::Rejected {
                reason,
                offending_text,
            } => {
                return ExecutionResult::Rejected {
                    reason,
                    sql: offending_text,
                }
            }
            ValidationVerdict::Accepted(text) => text,
        };

        let final_sql = rewrite(&text);
        if final_sql != text {
            debug!(original = %text, rewritten = %final_sql, "Applied shape rewrite");
        }

        match validate(&final_sql) {
            ValidationVerdict::Accepted(_) => {}
            ValidationVerdict::Rejected { reason, .. } => {
                return ExecutionResult::Rejected {
                    reason,
                    sql: final_sql,
                };
            }
        }

        match self.store.execute_read_only(&final_sql).await {
            Ok(result) => {
                info!(
                    rows = result.row_count,
                    duration_ms = result.execution_time.as_millis() as u64,
                    "Query executed"
                );
                ExecutionResult::Success {
                    sql: final_sql,
                    result,
                }
            }
            Err(error) => ExecutionResult::Failed {
                sql: final_sql,
                error,
            },
        }
    }
}

/// Outcome of one execution attempt.
#[derive(Debug)]
pub enum ExecutionResult {
    /// The query ran; the result may be empty (a valid outcome).
    Success { sql: String, result: QueryResult },
    /// The verdict was a rejection; the store was never touched.
    Rejected { reason: RejectReason, sql: String },
    /// The store reported an engine error on an accepted query.
    Failed {
        sql: String,
        error: StocklensError,
    },
}
