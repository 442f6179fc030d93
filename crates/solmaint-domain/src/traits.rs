//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! infrastructure. Implementations live in other crates.

use crate::{ExtractionId, ExtractionRecord, ExtractionStatistics, FieldMap};
use std::path::Path;

/// Version-tracked, append-only storage of extraction results
///
/// Implemented by the infrastructure layer (solmaint-store)
pub trait ExtractionStore {
    /// Error type for store operations
    type Error;

    /// Record a validated extraction with caller-supplied provenance.
    ///
    /// Assigns the next version for `source_file` and returns the new record's id.
    /// On error the store is left exactly as it was before the call.
    fn save_extraction_with_metadata(
        &mut self,
        source_file: &str,
        data: FieldMap,
        extras: Option<FieldMap>,
        metadata: FieldMap,
    ) -> Result<ExtractionId, Self::Error>;

    /// Record a validated extraction
    fn save_extraction(
        &mut self,
        source_file: &str,
        data: FieldMap,
        extras: Option<FieldMap>,
    ) -> Result<ExtractionId, Self::Error> {
        self.save_extraction_with_metadata(source_file, data, extras, FieldMap::new())
    }

    /// Look up a record by id; a missing id is `None`, not an error
    fn get_extraction_by_id(&self, id: &str) -> Option<&ExtractionRecord>;

    /// All records for `source_file`, ascending by version
    fn get_extraction_history(&self, source_file: &str) -> Vec<&ExtractionRecord>;

    /// Highest version for `source_file`
    fn get_latest_extraction(&self, source_file: &str) -> Option<&ExtractionRecord> {
        self.get_extraction_history(source_file).pop()
    }

    /// Every record in append order
    fn get_all_extractions(&self) -> &[ExtractionRecord];

    /// Aggregate counts over every record
    fn get_statistics(&self) -> ExtractionStatistics {
        ExtractionStatistics::from_records(self.get_all_extractions())
    }

    /// Write `{exported_at, statistics, extractions}` to `destination`
    fn export_audit_trail(&self, destination: &Path) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (solmaint-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Identifier of the model answering prompts, recorded as provenance
    fn model_name(&self) -> &str;
}

/// Trait for turning a document on disk into plain text
///
/// Implemented by the infrastructure layer (solmaint-pdf)
pub trait TextSource {
    /// Error type for text extraction
    type Error;

    /// Extract the document's text; empty or corrupt documents are errors
    fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}
