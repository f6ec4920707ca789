//! Generation service integration for Stocklens.
//!
//! Provides the trait and implementations for the external text-generation
//! service. The service is untrusted: everything it returns goes through the
//! sanitizer and the safety validator before it can touch the store.

pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod sanitize;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::{FailingGenerator, MockGenerator};
pub use prompt::{build_answer_prompt, build_query_prompt};
pub use sanitize::sanitize;

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::{Result, StocklensError};

/// Trait for clients of the text-generation service.
///
/// Implementations must be thread-safe (Send + Sync) to support concurrent
/// requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for the given prompt.
    ///
    /// Exactly one outbound call; no retries at this layer. A timeout is
    /// reported the same way as an unreachable service.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Generation service provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// Mock generator for testing (no API key required).
    Mock,
}

impl GeneratorProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for GeneratorProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown generation provider: {}", s)),
        }
    }
}

impl std::fmt::Display for GeneratorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates a generator client for the given provider.
///
/// The Gemini API key is resolved from the `GEMINI_API_KEY` environment
/// variable.
pub fn create_generator(
    provider: GeneratorProvider,
    model: &str,
    timeout_secs: u64,
) -> Result<Box<dyn TextGenerator>> {
    match provider {
        GeneratorProvider::Gemini => {
            let key = std::env::var("GEMINI_API_KEY").map_err(|_| {
                StocklensError::generation("No API key configured. Set GEMINI_API_KEY.")
            })?;
            let config = GeminiConfig::new(key, model).with_timeout(timeout_secs);
            Ok(Box::new(GeminiClient::new(config)?))
        }
        GeneratorProvider::Mock => Ok(Box::new(MockGenerator::new())),
    }
}
