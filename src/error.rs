//! Error types for Stocklens.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Stocklens operations.
#[derive(Error, Debug)]
pub enum StocklensError {
    /// Store errors (cannot open the database, schema bootstrap failed, etc.)
    #[error("Store error: {0}")]
    Store(String),

    /// Query execution errors (bad SQL, unknown relation/column, timeouts).
    ///
    /// Always recoverable: generated SQL is untrusted and may simply be wrong.
    #[error("Query error: {0}")]
    Query(String),

    /// Generation service errors (unreachable, timeout, empty response).
    #[error("Generation error: {0}")]
    Generation(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StocklensError {
    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a generation error with the given message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Store(_) => "Store Error",
            Self::Query(_) => "Query Error",
            Self::Generation(_) => "Generation Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using StocklensError.
pub type Result<T> = std::result::Result<T, StocklensError>;
