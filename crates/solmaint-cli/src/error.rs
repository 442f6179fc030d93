//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] solmaint_store::StoreError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] solmaint_llm::LlmError),

    /// Extractor setup error
    #[error("Extractor error: {0}")]
    Extractor(#[from] solmaint_extractor::ExtractorError),

    /// Schema error
    #[error("Schema error: {0}")]
    Gatekeeper(#[from] solmaint_gatekeeper::GatekeeperError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record matched the query
    #[error("Not found: {0}")]
    NotFound(String),

    /// At least one document in a batch failed
    #[error("{failed} of {total} file(s) failed to process")]
    ProcessingFailed {
        /// Failed documents
        failed: usize,
        /// Documents attempted
        total: usize,
    },
}
