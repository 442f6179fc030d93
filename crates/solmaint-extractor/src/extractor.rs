//! Core FieldExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractedFields, ExtractionMetadata, ExtractionResult};
use solmaint_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns document text into structured fields with an LLM
pub struct FieldExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> FieldExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new FieldExtractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
        })
    }

    /// Name of the model behind this extractor
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Extract fields from document text
    ///
    /// # Errors
    ///
    /// - `EmptyText` / `TextTooLong` before any LLM call is made
    /// - `Timeout` if the LLM does not answer within the configured limit
    /// - `Llm` if the provider fails
    /// - `ExtractionFailure` if the reply is not a JSON object
    pub async fn extract_fields(&self, text: &str) -> Result<ExtractionResult, ExtractorError> {
        let start_time = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractorError::EmptyText);
        }
        let text_length = text.chars().count();
        if text_length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text_length,
                self.config.max_text_length,
            ));
        }

        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} chars", prompt.len());

        let llm_response = timeout(self.config.extraction_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))??;

        debug!("LLM response length: {} chars", llm_response.len());

        let fields = parse_llm_response(&llm_response)?;

        let metadata = ExtractionMetadata {
            model_name: self.model_name().to_string(),
            text_length,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            fields = fields.data.len(),
            extras = fields.extras.len(),
            elapsed_ms = metadata.processing_time_ms,
            "Extraction complete"
        );

        Ok(ExtractionResult { fields, metadata })
    }

    /// Whether every required field is present, warning for each one missing
    pub fn has_required_fields(&self, fields: &ExtractedFields) -> bool {
        let missing = fields.missing_required();
        for field in &missing {
            warn!("Missing required field: {}", field);
        }
        missing.is_empty()
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solmaint_llm::MockProvider;

    fn create_test_extractor(response: &str) -> FieldExtractor<MockProvider> {
        FieldExtractor::new(MockProvider::new(response), ExtractorConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_extract_empty_object() {
        let extractor = create_test_extractor("{}");

        let result = extractor.extract_fields("Some text").await.unwrap();
        assert!(result.fields.data.is_empty());
        assert!(result.fields.extras.is_empty());
        assert_eq!(result.metadata.model_name, "mock");
        assert_eq!(result.metadata.text_length, 9);
        assert!(!extractor.has_required_fields(&result.fields));
    }

    #[tokio::test]
    async fn test_extract_text_too_long() {
        let extractor = FieldExtractor::new(
            MockProvider::default(),
            ExtractorConfig {
                max_text_length: 10,
                ..Default::default()
            },
        )
        .unwrap();

        let result = extractor.extract_fields(&"a".repeat(11)).await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(11, 10))));
    }

    #[tokio::test]
    async fn test_extract_empty_text() {
        let extractor = create_test_extractor("{}");
        let result = extractor.extract_fields(" \n ").await;
        assert!(matches!(result, Err(ExtractorError::EmptyText)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = FieldExtractor::new(
            MockProvider::default(),
            ExtractorConfig {
                extraction_timeout_secs: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
