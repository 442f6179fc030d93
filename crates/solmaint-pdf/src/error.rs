//! Error types for PDF processing

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a PDF
#[derive(Error, Debug)]
pub enum PdfError {
    /// No file at the given path
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but yielded no usable text
    #[error("Failed to process PDF {}: {reason}", path.display())]
    UnreadableDocument {
        /// Offending file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

impl PdfError {
    pub(crate) fn unreadable(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::UnreadableDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
