//! Read-only policy enforcement for generated SQL.
//!
//! The generation service is treated exactly like an untrusted client
//! submitting SQL: this module is the security boundary, not a convenience
//! filter. The policy is deliberately lexical — denylist on operation
//! keywords, allow-list on the statement entry keyword — and every ambiguity
//! resolves toward rejection. Rejecting a safe query that merely contains a
//! denylisted word in a string literal is acceptable; letting a mutating
//! statement through is not.

pub mod lexer;

use std::fmt;

use lexer::{first_word, scan_words};

/// Mutation, schema and administrative verbs that reject a statement when
/// they appear anywhere in the text.
const FORBIDDEN_TOKENS: [&str; 11] = [
    "insert", "update", "delete", "drop", "alter", "create", "replace", "attach", "detach",
    "pragma", "vacuum",
];

/// Statement-leading tokens permitted by policy.
const READ_ONLY_ENTRY_KEYWORDS: [&str; 2] = ["select", "with"];

/// Why a candidate query was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A denylisted operation keyword appeared somewhere in the text.
    ForbiddenOperation(String),
    /// The statement does not begin with a read-only entry keyword.
    NotReadOnly,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForbiddenOperation(token) => {
                write!(f, "forbidden operation '{}'", token.to_uppercase())
            }
            Self::NotReadOnly => write!(f, "only SELECT or WITH queries are allowed"),
        }
    }
}

/// Terminal verdict for one candidate query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The text passed the read-only policy and may be executed.
    Accepted(String),
    /// The text was rejected; it must never reach the executor.
    Rejected {
        reason: RejectReason,
        offending_text: String,
    },
}

impl ValidationVerdict {
    /// Returns true if the verdict is an acceptance.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Applies the read-only policy to a sanitized candidate query.
///
/// Case-insensitive over the whole statement:
/// 1. any denylisted word anywhere (word-boundary match, string literals and
///    comments included) rejects with [`RejectReason::ForbiddenOperation`];
/// 2. the first non-whitespace token must be `SELECT` or `WITH`, otherwise
///    [`RejectReason::NotReadOnly`].
pub fn validate(text: &str) -> ValidationVerdict {
    for word in scan_words(text) {
        let lowered = word.to_ascii_lowercase();
        if FORBIDDEN_TOKENS.contains(&lowered.as_str()) {
            return ValidationVerdict::Rejected {
                reason: RejectReason::ForbiddenOperation(lowered),
                offending_text: text.to_string(),
            };
        }
    }

    match first_word(text) {
        Some(word)
            if READ_ONLY_ENTRY_KEYWORDS
                .iter()
                .any(|kw| word.eq_ignore_ascii_case(kw)) =>
        {
            ValidationVerdict::Accepted(text.to_string())
        }
        _ => ValidationVerdict::Rejected {
            reason: RejectReason::NotReadOnly,
            offending_text: text.to_string(),
        },
    }
}
