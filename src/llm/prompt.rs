//! Prompt construction for generation requests.
//!
//! Two fixed templates: one for query generation, one for answer synthesis.
//! The schema is embedded verbatim so the generator is at least shown the
//! real relation and column names; the validator remains the actual boundary.

use crate::db::SchemaDescriptor;

/// Template for the query-generation call.
const QUERY_PROMPT_TEMPLATE: &str = r#"You are an expert SQL analyst for an inventory management system.
Database schema:
{schema}

User question: "{question}"

Generate the most relevant SQL SELECT query to retrieve the data needed to answer it.
Return ONLY the SQL query. Do not include explanations."#;

/// Template for the answer-synthesis call.
const ANSWER_PROMPT_TEMPLATE: &str = r#"You are an inventory analyst assistant.
The following table is the SQL query result:

{data}

Based on this, answer the original user question:
"{question}"

Give a short, clear explanation with insights."#;

/// Builds the query-generation prompt with the schema injected.
pub fn build_query_prompt(question: &str, schema: &SchemaDescriptor) -> String {
    QUERY_PROMPT_TEMPLATE
        .replace("{schema}", &schema.format_for_prompt())
        .replace("{question}", question)
}

/// Builds the answer-synthesis prompt over a rendered result sample.
///
/// `data_summary` is either the rendered sample table or the explicit
/// no-rows signal; it is never an empty string.
pub fn build_answer_prompt(question: &str, data_summary: &str) -> String {
    ANSWER_PROMPT_TEMPLATE
        .replace("{data}", data_summary)
        .replace("{question}", question)
}
