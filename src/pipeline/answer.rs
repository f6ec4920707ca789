//! Result rendering and answer synthesis.
//!
//! The synthesizer fails closed: whatever happens upstream, the caller gets
//! back a displayable string for the question it asked.

use crate::db::QueryResult;
use crate::error::StocklensError;
use crate::llm::{build_answer_prompt, TextGenerator};
use crate::safety::RejectReason;

/// Maximum number of result rows fed into the synthesis prompt.
pub const SAMPLE_ROWS: usize = 10;

/// Explicit signal used instead of rendering an empty table.
pub const NO_ROWS_SIGNAL: &str = "No rows found for this query.";

/// Renders a bounded leading sample of the result as a plain text table.
///
/// Zero-row results yield [`NO_ROWS_SIGNAL`] so the synthesis prompt carries
/// an explicit statement rather than an empty rendering.
pub fn render_sample(result: &QueryResult) -> String {
    if result.is_empty() {
        return NO_ROWS_SIGNAL.to_string();
    }

    let header = result
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    let separator = result
        .columns
        .iter()
        .map(|_| "---")
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![header, separator];
    for row in result.rows.iter().take(SAMPLE_ROWS) {
        lines.push(
            row.iter()
                .map(|v| v.to_display_string())
                .collect::<Vec<_>>()
                .join(" | "),
        );
    }

    lines.join("\n")
}

/// Produces the final natural-language answer for a successful execution.
///
/// One generation call over the question and the rendered sample. If the
/// call fails, a templated error string comes back instead of a fault.
pub async fn synthesize(
    generator: &dyn TextGenerator,
    question: &str,
    sample: &str,
) -> String {
    let prompt = build_answer_prompt(question, sample);
    match generator.complete(&prompt).await {
        Ok(answer) => answer.trim().to_string(),
        Err(error) => synthesis_failure_message(&error),
    }
}

/// Diagnostic for a generation failure before any query exists.
pub fn upstream_failure_message(error: &StocklensError) -> String {
    format!("Error communicating with the generation service: {error}")
}

/// Diagnostic for a validator rejection, naming the reason and the query.
pub fn rejection_message(reason: &RejectReason, sql: &str) -> String {
    format!("Query blocked: {reason}.\n\nRejected query:\n{sql}")
}

/// Diagnostic for an engine failure on an accepted query.
pub fn execution_failure_message(sql: &str, error: &StocklensError) -> String {
    format!("The generated query could not be executed.\n\nQuery:\n{sql}\n\n{error}")
}

/// Diagnostic for a generation failure after a successful execution.
fn synthesis_failure_message(error: &StocklensError) -> String {
    format!("The query ran, but no answer could be generated: {error}")
}
