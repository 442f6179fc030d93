//! Solmaint Domain Layer
//!
//! Core types and trait seams shared by every other crate in the workspace.
//! Infrastructure (JSON persistence, PDF parsing, LLM transport) lives elsewhere;
//! this crate only describes what an extraction *is* and what the collaborators
//! around the store must provide.
//!
//! ## Key Concepts
//!
//! - **Extraction**: one structured-data result derived from one document, at one version
//! - **Version**: per-source-file sequence number, starting at 1
//! - **Audit trail**: exported history of extractions plus summary statistics
//!
//! Records are immutable once created; a correction for the same document is a
//! new record with the next version.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod statistics;
pub mod timestamp;
pub mod traits;

// Re-exports for convenience
pub use record::{
    AuditTrail, ExtractionCollection, ExtractionId, ExtractionRecord, FieldMap, RecordMetadata,
};
pub use statistics::ExtractionStatistics;
pub use timestamp::Timestamp;
