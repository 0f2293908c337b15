//! Turning page text into business records with a completion call.

pub mod parse;
mod record;

pub use parse::{parse_response, ParsedArray};
pub use record::{BusinessRecord, DedupKey, RECORD_FIELDS};

use tracing::debug;

use crate::llm::{prompts, truncate_content, Completion, LlmError};

/// What one page's extraction produced.
#[derive(Debug, Clone)]
pub struct ExtractionAttempt {
    /// Model response as received.
    pub raw: String,
    /// Parse strategy that recovered an array, if any.
    pub strategy: Option<&'static str>,
    /// Number of array elements before validation.
    pub parsed: usize,
    /// Elements that passed validation, in response order.
    pub records: Vec<BusinessRecord>,
}

impl ExtractionAttempt {
    /// Parse and validate a raw model response.
    pub fn from_response(raw: String) -> Self {
        let ParsedArray { strategy, items } = parse_response(&raw);
        let records = items.iter().filter_map(BusinessRecord::from_value).collect();
        Self {
            strategy,
            parsed: items.len(),
            records,
            raw,
        }
    }
}

/// Sends page text through the extraction prompt.
pub struct RecordExtractor<C> {
    completion: C,
    max_content_chars: usize,
}

impl<C: Completion> RecordExtractor<C> {
    pub fn new(completion: C, max_content_chars: usize) -> Self {
        Self {
            completion,
            max_content_chars,
        }
    }

    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.max_content_chars = max_content_chars;
        self
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    pub fn build_prompt(&self, text: &str) -> String {
        prompts::render(
            prompts::EXTRACTION_PROMPT,
            truncate_content(text, self.max_content_chars),
        )
    }

    /// One completion call, no retry. Malformed output is not an error; it
    /// just yields an attempt without records.
    pub async fn extract(&self, text: &str) -> Result<ExtractionAttempt, LlmError> {
        let prompt = self.build_prompt(text);
        let raw = self.completion.complete(&prompt).await?;
        let attempt = ExtractionAttempt::from_response(raw);
        debug!(
            "Extraction parsed {} items ({}), {} valid",
            attempt.parsed,
            attempt.strategy.unwrap_or("no strategy matched"),
            attempt.records.len()
        );
        Ok(attempt)
    }
}
