//! Solmaint PDF Text Source
//!
//! Turns a PDF document into cleaned plain text ready for field extraction.
//! Text comes from `pdf-extract`; page structure for [`PdfInfo`] comes from
//! `lopdf`.
//!
//! # Examples
//!
//! ```
//! use solmaint_pdf::clean_text;
//!
//! let cleaned = clean_text("SolarTech   Inc\n\n3\nCONFIDENTIAL\nPage 1 of 2\nModel INV-5000");
//! assert_eq!(cleaned, "SolarTech Inc\nModel INV-5000");
//! ```

#![warn(missing_docs)]

mod error;

pub use error::PdfError;

use serde::Serialize;
use solmaint_domain::traits::TextSource;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error, info};

/// Whole-line boilerplate dropped by [`clean_text`] (compared lowercase)
const BOILERPLATE_LINES: &[&str] = &["page", "page of", "confidential", "internal use only"];

/// Lines shorter than this are treated as noise
const MIN_LINE_CHARS: usize = 3;

/// Basic facts about a PDF file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfInfo {
    /// Number of pages
    pub pages: usize,
    /// Size on disk in bytes
    pub file_size: u64,
    /// File name without directories
    pub filename: String,
}

/// Reads PDFs from disk and produces cleaned text
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    /// Create a new processor
    pub fn new() -> Self {
        Self
    }

    /// Extract and clean the text of the PDF at `path`
    ///
    /// # Errors
    ///
    /// - `NotFound` if there is no file at `path`
    /// - `UnreadableDocument` if the parser fails or no text remains
    pub fn extract_text(&self, path: &Path) -> Result<String, PdfError> {
        let bytes = read_pdf(path)?;

        let raw = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to extract text");
            PdfError::unreadable(path, e.to_string())
        })?;

        if raw.trim().is_empty() {
            return Err(PdfError::unreadable(path, "no text content found"));
        }

        let cleaned = clean_text(&raw);
        if cleaned.is_empty() {
            return Err(PdfError::unreadable(path, "no text left after cleaning"));
        }

        info!(
            file = %display_name(path),
            chars = cleaned.chars().count(),
            "Extracted text from PDF"
        );
        Ok(cleaned)
    }

    /// Page count, size and file name of the PDF at `path`
    pub fn pdf_info(&self, path: &Path) -> Result<PdfInfo, PdfError> {
        let bytes = read_pdf(path)?;
        let document = lopdf::Document::load_mem(&bytes)
            .map_err(|e| PdfError::unreadable(path, e.to_string()))?;

        Ok(PdfInfo {
            pages: document.get_pages().len(),
            file_size: bytes.len() as u64,
            filename: display_name(path),
        })
    }

    /// Whether `path` yields non-empty text
    pub fn is_readable(&self, path: &Path) -> bool {
        match self.extract_text(path) {
            Ok(text) => !text.trim().is_empty(),
            Err(e) => {
                debug!(error = %e, "PDF is not readable");
                false
            }
        }
    }
}

impl TextSource for PdfProcessor {
    type Error = PdfError;

    fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        PdfProcessor::extract_text(self, path)
    }
}

fn read_pdf(path: &Path) -> Result<Vec<u8>, PdfError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PdfError::NotFound(path.to_path_buf()),
        _ => PdfError::unreadable(path, e.to_string()),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Normalize raw PDF text
///
/// NUL characters are removed and carriage returns become line breaks. Within
/// each line whitespace runs collapse to one space. Lines that are too short,
/// purely numeric, or page furniture (`Page 3`, `Page 3 of 10`, `Confidential`)
/// are dropped. Surviving lines are joined with `\n`.
pub fn clean_text(text: &str) -> String {
    let normalized = text.replace('\0', "").replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !is_noise_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_noise_line(line: &str) -> bool {
    if line.chars().count() < MIN_LINE_CHARS {
        return true;
    }
    if line.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = line.to_lowercase();
    BOILERPLATE_LINES.contains(&lower.as_str()) || is_page_header(&lower)
}

/// `page N` or `page N of M`, already lowercased and whitespace-collapsed
fn is_page_header(lower: &str) -> bool {
    let Some(rest) = lower.strip_prefix("page ") else {
        return false;
    };
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match rest.split_once(" of ") {
        Some((n, m)) => is_number(n) && is_number(m),
        None => is_number(rest),
    }
}
