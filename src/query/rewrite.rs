//! Shape rewriting for engine compatibility.
//!
//! SQLite cannot always evaluate a row filter against a window result
//! directly. When an accepted statement combines an analytic construct with a
//! WHERE clause, the statement is wrapped as a CTE and re-selected whole,
//! moving filter evaluation to a context the engine can resolve. This is a
//! targeted compatibility patch, not an optimizer: the result set is
//! unchanged, only the evaluation is restructured.

use crate::safety::lexer::{first_word, tokenize, Token};

/// Window/analytic function names that mark a statement as windowed when
/// followed by an argument list.
const WINDOW_FUNCTIONS: [&str; 11] = [
    "lag",
    "lead",
    "row_number",
    "rank",
    "dense_rank",
    "ntile",
    "first_value",
    "last_value",
    "nth_value",
    "cume_dist",
    "percent_rank",
];

/// Rewrites an accepted statement into an engine-evaluable form.
///
/// Total: statements that do not need the rewrite come back unchanged.
/// Only plain SELECT statements are wrapped; a statement already beginning
/// with WITH keeps its own structure. Detection runs on scanner tokens, so
/// keywords inside string literals never trigger a rewrite.
pub fn rewrite(text: &str) -> String {
    let starts_with_select = first_word(text)
        .map(|w| w.eq_ignore_ascii_case("select"))
        .unwrap_or(false);
    if !starts_with_select {
        return text.to_string();
    }

    let tokens = tokenize(text);
    if !(has_window_construct(&tokens) && has_where_clause(&tokens)) {
        return text.to_string();
    }

    let core = text.trim().trim_end_matches(';').trim_end();
    format!("WITH base AS ({core}) SELECT * FROM base;")
}

fn has_where_clause(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.is_keyword("where"))
}

fn has_window_construct(tokens: &[Token]) -> bool {
    tokens.iter().enumerate().any(|(i, token)| {
        if token.is_keyword("over") {
            return true;
        }
        WINDOW_FUNCTIONS.iter().any(|f| token.is_keyword(f))
            && tokens.get(i + 1) == Some(&Token::Symbol('('))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_with_where_is_wrapped() {
        let sql = "SELECT item_name, count, LAG(count) OVER (PARTITION BY item_name ORDER BY timestamp) AS prev \
                   FROM inventory_log WHERE item_name = 'Sprite';";
        let rewritten = rewrite(sql);

        assert!(rewritten.starts_with("WITH base AS (SELECT"));
        assert!(rewritten.ends_with(") SELECT * FROM base;"));
        assert!(!rewritten.contains(";)"));
    }

    #[test]
    fn test_rewritten_text_revalidates_as_read_only() {
        let sql =
            "SELECT count, LAG(count) OVER (ORDER BY timestamp) FROM inventory_log WHERE count > 5;";
        assert!(validate(&rewrite(sql)).is_accepted());
    }

    #[test]
    fn test_window_without_where_unchanged() {
        let sql = "SELECT item_name, ROW_NUMBER() OVER (ORDER BY stock_count) FROM inventory_current;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn test_where_without_window_unchanged() {
        let sql = "SELECT * FROM inventory_current WHERE stock_count < 10;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn test_with_prefixed_statement_unchanged() {
        let sql = "WITH t AS (SELECT count, LAG(count) OVER (ORDER BY timestamp) FROM inventory_log) \
                   SELECT * FROM t WHERE count > 5;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn test_keywords_in_string_literal_do_not_trigger() {
        let sql = "SELECT * FROM inventory_log WHERE item_name = 'lag (over)';";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn test_window_word_without_call_does_not_trigger() {
        // A column named "rank" is not a window function reference.
        let sql = "SELECT rank FROM inventory_current WHERE stock_count < 10;";
        assert_eq!(rewrite(sql), sql);
    }

    #[test]
    fn test_statement_without_terminator_gains_one() {
        let sql = "SELECT LAG(count) OVER (ORDER BY timestamp) FROM inventory_log WHERE count > 5";
        let rewritten = rewrite(sql);
        assert!(rewritten.ends_with(") SELECT * FROM base;"));
    }

    #[test]
    fn test_case_insensitive_detection() {
        let sql = "select lag(count) over (order by timestamp) from inventory_log where count > 5;";
        assert!(rewrite(sql).starts_with("WITH base AS ("));
    }
}
