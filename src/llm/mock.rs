//! Mock generators for testing.
//!
//! Deterministic stand-ins for the generation service so pipeline behavior
//! can be tested without network access.

use async_trait::async_trait;

use crate::error::{Result, StocklensError};
use crate::llm::TextGenerator;

/// Mock generator that returns canned responses based on prompt patterns.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    /// Custom response mappings (pattern -> response), checked in order.
    custom_responses: Vec<(String, String)>,
}

impl MockGenerator {
    /// Creates a new mock generator with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern` (case-insensitive), the mock
    /// returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    fn mock_response(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // Query-generation prompts embed the schema block.
        if prompt_lower.contains("database schema") {
            return "```sql\nSELECT item_name, stock_count FROM inventory_current;\n```"
                .to_string();
        }

        // Answer-synthesis prompts embed the rendered result.
        if prompt_lower.contains("sql query result") {
            return "Stock levels look healthy across the tracked items.".to_string();
        }

        "I don't understand that question. Could you please rephrase it?".to_string()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.mock_response(prompt))
    }
}

/// A generator whose calls always fail, for exercising upstream-failure
/// paths.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    /// Creates a failing generator with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingGenerator {
    fn default() -> Self {
        Self::new("Failed to connect to the Gemini API. Check your network.")
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(StocklensError::generation(self.message.clone()))
    }
}
