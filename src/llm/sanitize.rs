//! Sanitization of raw generator output.
//!
//! A deterministic, pure text transformation that never fails: worst case it
//! returns an empty or nonsensical string, which the validator then rejects.

use regex::Regex;
use std::sync::OnceLock;

fn fenced_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("static regex"))
}

/// Sanitizes raw generator output into at most one statement.
///
/// - strips a surrounding code fence (with optional language tag);
/// - removes any embedded fenced blocks entirely (formatting noise);
/// - keeps only the first `;`-terminated statement, re-appending the
///   terminator (one is appended if the text has none).
///
/// Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let text = strip_outer_fences(raw.trim());
    let text = fenced_block_re().replace_all(&text, "");
    let text = text.trim();

    if text.is_empty() {
        return String::new();
    }

    first_statement(text)
}

/// Strips a leading fence marker (and language tag) and a trailing fence.
fn strip_outer_fences(text: &str) -> String {
    let mut s = text;
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim().to_string()
}

/// Truncates to the first statement terminator, inclusive.
fn first_statement(text: &str) -> String {
    match text.find(';') {
        Some(idx) => format!("{};", text[..idx].trim_end()),
        None => format!("{};", text),
    }
}
