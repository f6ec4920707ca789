//! The question-answering pipeline.
//!
//! One stateless invocation per request:
//! question → generate → sanitize → validate → rewrite → execute →
//! synthesize → answer. A rejection or execution failure short-circuits into
//! a diagnostic that names the offending query; there is no retry against the
//! generator and no path that executes unvalidated text. Every path ends in a
//! displayable string.

pub mod answer;

pub use answer::{render_sample, NO_ROWS_SIGNAL, SAMPLE_ROWS};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::db::{SchemaDescriptor, StoreClient};
use crate::llm::{build_query_prompt, sanitize, TextGenerator};
use crate::query::{ExecutionResult, QueryExecutor};
use crate::safety::validate;

/// Origin of a candidate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource {
    /// Produced by the generation service.
    Generated,
}

/// A query string produced by the generation service, not yet trusted.
///
/// Fresh per request and never reused: the same question may legitimately
/// produce different queries, and correctness is re-validated every time.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// The raw generator output before sanitization.
    pub raw_text: String,
    /// Where the candidate came from.
    pub source: QuerySource,
}

/// Transient audit trail of one request.
///
/// Not persisted; surfaced to the caller for diagnostics (`--show-sql`) and
/// logged, since the generator is untrusted and worth auditing.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    /// The operator's question, verbatim.
    pub question: String,
    /// The final query text sent to (or rejected before) the store, if a
    /// candidate was ever produced.
    pub final_query_text: Option<String>,
    /// The rendered result sample fed into synthesis, if execution succeeded.
    pub result_sample: Option<String>,
    /// The displayable answer or diagnostic. Never empty.
    pub answer_text: String,
}

/// The question-answering pipeline.
pub struct AskPipeline {
    generator: Box<dyn TextGenerator>,
    store: Arc<dyn StoreClient>,
    schema: SchemaDescriptor,
}

impl AskPipeline {
    /// Creates a pipeline over a generator, a store, and the schema
    /// descriptor embedded into every generation prompt.
    pub fn new(
        generator: Box<dyn TextGenerator>,
        store: Arc<dyn StoreClient>,
        schema: SchemaDescriptor,
    ) -> Self {
        Self {
            generator,
            store,
            schema,
        }
    }

    /// Answers one free-text question.
    ///
    /// Always returns a record with a displayable answer string; failures are
    /// folded into diagnostics rather than propagated. Only a generation
    /// failure at the first call short-circuits before any query exists.
    pub async fn ask(&self, question: &str) -> AnswerRecord {
        let start = Instant::now();
        debug!(question_len = question.len(), "Starting ask pipeline");

        let prompt = build_query_prompt(question, &self.schema);
        let candidate = match self.generator.complete(&prompt).await {
            Ok(raw_text) => CandidateQuery {
                raw_text,
                source: QuerySource::Generated,
            },
            Err(error) => {
                warn!(%error, "Query generation failed");
                return AnswerRecord {
                    question: question.to_string(),
                    final_query_text: None,
                    result_sample: None,
                    answer_text: answer::upstream_failure_message(&error),
                };
            }
        };

        let sanitized = sanitize(&candidate.raw_text);
        debug!(
            raw_len = candidate.raw_text.len(),
            source = ?candidate.source,
            sql = %sanitized,
            "Sanitized candidate query"
        );

        let verdict = validate(&sanitized);
        let executor = QueryExecutor::new(self.store.as_ref());
        let execution = executor.execute(verdict).await;

        let record = match execution {
            ExecutionResult::Rejected { reason, sql } => {
                warn!(%reason, sql = %sql, "Candidate query rejected");
                AnswerRecord {
                    question: question.to_string(),
                    answer_text: answer::rejection_message(&reason, &sql),
                    final_query_text: Some(sql),
                    result_sample: None,
                }
            }
            ExecutionResult::Failed { sql, error } => {
                warn!(%error, sql = %sql, "Accepted query failed to execute");
                AnswerRecord {
                    question: question.to_string(),
                    answer_text: answer::execution_failure_message(&sql, &error),
                    final_query_text: Some(sql),
                    result_sample: None,
                }
            }
            ExecutionResult::Success { sql, result } => {
                let sample = render_sample(&result);
                let answer_text =
                    answer::synthesize(self.generator.as_ref(), question, &sample).await;
                AnswerRecord {
                    question: question.to_string(),
                    final_query_text: Some(sql),
                    result_sample: Some(sample),
                    answer_text,
                }
            }
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            has_query = record.final_query_text.is_some(),
            has_sample = record.result_sample.is_some(),
            "Ask pipeline complete"
        );

        record
    }
}
