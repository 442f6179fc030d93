//! Solmaint Extractor
//!
//! Converts cleaned document text into structured inverter fields using an LLM.
//!
//! # Architecture
//!
//! ```text
//! PDF text → FieldExtractor → LLM → {data, extras} → SchemaValidator → ExtractionStore
//! ```
//!
//! The extractor only knows the field catalogue and the reply format. It never
//! validates values; that is the schema validator's job.
//!
//! # Example Usage
//!
//! ```no_run
//! use solmaint_extractor::{ExtractorConfig, FieldExtractor};
//! use solmaint_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"supplier_name": "SolarTech Inc"}"#);
//! let extractor = FieldExtractor::new(llm, ExtractorConfig::default())?;
//!
//! let result = extractor.extract_fields("SolarTech Inc inverter datasheet").await?;
//! println!("{} fields, complete: {}",
//!     result.fields.data.len(),
//!     extractor.has_required_fields(&result.fields));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::FieldExtractor;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
pub use types::{
    known_field, required_fields, ExtractedFields, ExtractionMetadata, ExtractionResult,
    FieldKind, FieldSpec, INVERTER_FIELDS,
};
