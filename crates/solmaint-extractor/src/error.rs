//! Error types for the field extractor

use thiserror::Error;

/// Errors that can occur during field extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Nothing to extract from
    #[error("Document text is empty")]
    EmptyText,

    /// Extraction timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// The model's reply could not be turned into fields
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::ExtractionFailure(format!("Invalid JSON response: {}", e))
    }
}
