//! Batch orchestration: PDF text → fields → validation → store.

use crate::error::{CliError, Result};
use anyhow::Context;
use serde::Serialize;
use solmaint_domain::traits::{ExtractionStore, LlmProvider, TextSource};
use solmaint_domain::{ExtractionId, RecordMetadata};
use solmaint_extractor::FieldExtractor;
use solmaint_gatekeeper::SchemaValidator;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Whether a document made it into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Stored
    Success,
    /// Some stage failed
    Failed,
}

/// Result of one document in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOutcome {
    /// File name as recorded in the store
    pub file: String,

    /// Outcome
    pub status: OutcomeStatus,

    /// Id of the saved record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_id: Option<ExtractionId>,

    /// Error chain of a failed document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals for a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingSummary {
    /// Documents attempted
    pub processed_files: usize,

    /// Documents stored
    pub successful_extractions: usize,

    /// Documents that failed at any stage
    pub failed_extractions: usize,

    /// Per-document outcomes, in processing order
    pub outcomes: Vec<DocumentOutcome>,
}

impl ProcessingSummary {
    /// Whether every document was stored
    pub fn all_succeeded(&self) -> bool {
        self.failed_extractions == 0
    }

    fn record_success(&mut self, file: String, id: ExtractionId) {
        self.processed_files += 1;
        self.successful_extractions += 1;
        self.outcomes.push(DocumentOutcome {
            file,
            status: OutcomeStatus::Success,
            extraction_id: Some(id),
            error: None,
        });
    }

    fn record_failure(&mut self, file: String, error: String) {
        self.processed_files += 1;
        self.failed_extractions += 1;
        self.outcomes.push(DocumentOutcome {
            file,
            status: OutcomeStatus::Failed,
            extraction_id: None,
            error: Some(error),
        });
    }
}

/// `*.pdf` files directly inside `input_dir`, sorted by name
///
/// The extension match is case-insensitive. An empty directory is not an
/// error, only a warning.
pub fn discover_pdfs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "Input directory {} does not exist",
            input_dir.display()
        )));
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    if pdfs.is_empty() {
        warn!("No PDF files found in {}", input_dir.display());
    }
    Ok(pdfs)
}

/// Runs documents through every stage and saves the results
pub struct Pipeline<T, L, S>
where
    L: LlmProvider,
{
    text_source: T,
    extractor: FieldExtractor<L>,
    validator: SchemaValidator,
    store: S,
}

impl<T, L, S> Pipeline<T, L, S>
where
    T: TextSource,
    T::Error: std::error::Error + Send + Sync + 'static,
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    S: ExtractionStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Assemble a pipeline from its stages
    pub fn new(
        text_source: T,
        extractor: FieldExtractor<L>,
        validator: SchemaValidator,
        store: S,
    ) -> Self {
        Self {
            text_source,
            extractor,
            validator,
            store,
        }
    }

    /// The store results are saved into
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the store back
    pub fn into_store(self) -> S {
        self.store
    }

    /// Process a single document and return the id of its stored record
    pub async fn process_document(&mut self, path: &Path) -> anyhow::Result<ExtractionId> {
        let start = Instant::now();
        let source_file = file_name(path);

        let text = self
            .text_source
            .extract_text(path)
            .context("text extraction failed")?;

        let extraction = self
            .extractor
            .extract_fields(&text)
            .await
            .context("field extraction failed")?;

        // Validation reports the same gaps as a hard error
        self.extractor.has_required_fields(&extraction.fields);

        let cleaned = self
            .validator
            .validate(&extraction.fields.data)
            .context("schema validation failed")?;

        let mut metadata = RecordMetadata::new()
            .with_llm_model(extraction.metadata.model_name)
            .with_processing_time_ms(start.elapsed().as_millis() as u64);
        if let Ok(file_meta) = fs::metadata(path) {
            metadata = metadata.with_file_size(file_meta.len());
        }

        let id = self
            .store
            .save_extraction_with_metadata(
                &source_file,
                cleaned,
                Some(extraction.fields.extras),
                metadata.into_field_map(),
            )
            .context("saving extraction failed")?;

        Ok(id)
    }

    /// Process every PDF in `input_dir`
    ///
    /// A failing document is recorded in the summary and the batch moves on.
    /// Only a missing or unreadable input directory is an error.
    pub async fn process_directory(&mut self, input_dir: &Path) -> Result<ProcessingSummary> {
        let pdfs = discover_pdfs(input_dir)?;
        let mut summary = ProcessingSummary::default();

        for path in &pdfs {
            let file = file_name(path);
            info!("Processing {}", file);

            match self.process_document(path).await {
                Ok(id) => {
                    info!(id = %id, "Successfully processed {}", file);
                    summary.record_success(file, id);
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", file, e);
                    summary.record_failure(file, format!("{:#}", e));
                }
            }
        }

        info!(
            processed = summary.processed_files,
            succeeded = summary.successful_extractions,
            failed = summary.failed_extractions,
            "Batch complete"
        );
        Ok(summary)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
