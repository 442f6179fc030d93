//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::{OutcomeStatus, ProcessingSummary};
use colored::*;
use serde_json::Value;
use solmaint_domain::{ExtractionRecord, ExtractionStatistics, FieldMap};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of records.
    pub fn format_records(&self, records: &[&ExtractionRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.format_records_table(records)),
        }
    }

    /// Format a single record with all of its fields.
    pub fn format_record(&self, record: &ExtractionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.format_record_table(record)),
        }
    }

    /// Format store statistics.
    pub fn format_statistics(&self, stats: &ExtractionStatistics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Table => {
                let latest = stats
                    .latest_extraction_timestamp
                    .as_ref()
                    .map(|ts| ts.to_string())
                    .unwrap_or_else(|| "-".to_string());

                let mut builder = Builder::default();
                builder.push_record(["Statistic", "Value"]);
                builder.push_record(["Total extractions", &stats.total_extractions.to_string()]);
                builder.push_record(["Unique files", &stats.unique_files.to_string()]);
                builder.push_record([
                    "Files with multiple versions",
                    &stats.files_with_multiple_versions.to_string(),
                ]);
                builder.push_record(["Latest extraction", &latest]);
                Ok(render(builder))
            }
        }
    }

    /// Format the result of a batch run.
    pub fn format_summary(&self, summary: &ProcessingSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => {
                if summary.outcomes.is_empty() {
                    return Ok(self.warning("No PDF files processed."));
                }

                let mut builder = Builder::default();
                builder.push_record(["File", "Status", "Extraction ID / Error"]);
                for outcome in &summary.outcomes {
                    let (status, detail) = match outcome.status {
                        OutcomeStatus::Success => (
                            self.colorize("success", "green"),
                            outcome
                                .extraction_id
                                .as_ref()
                                .map(|id| id.to_string())
                                .unwrap_or_default(),
                        ),
                        OutcomeStatus::Failed => (
                            self.colorize("failed", "red"),
                            outcome.error.clone().unwrap_or_default(),
                        ),
                    };
                    builder.push_record([outcome.file.as_str(), &status, &detail]);
                }

                let totals = format!(
                    "Processed {} file(s): {} succeeded, {} failed",
                    summary.processed_files,
                    summary.successful_extractions,
                    summary.failed_extractions
                );
                let totals = if summary.all_succeeded() {
                    self.success(&totals)
                } else {
                    self.error(&totals)
                };
                Ok(format!("{}\n{}", render(builder), totals))
            }
        }
    }

    fn format_records_table(&self, records: &[&ExtractionRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No extractions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Source file", "Version", "Extracted at", "Product", "Supplier"]);

        for record in records {
            builder.push_record([
                record.id.to_string(),
                record.source_file.clone(),
                record.version.to_string(),
                record.extracted_at.to_string(),
                display_field(&record.data, "product_code"),
                display_field(&record.data, "supplier_name"),
            ]);
        }

        render(builder)
    }

    fn format_record_table(&self, record: &ExtractionRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["id".to_string(), record.id.to_string()]);
        builder.push_record(["source_file".to_string(), record.source_file.clone()]);
        builder.push_record(["version".to_string(), record.version.to_string()]);
        builder.push_record(["extracted_at".to_string(), record.extracted_at.to_string()]);

        for (section, map) in [
            ("data", &record.data),
            ("extras", &record.extras),
            ("metadata", &record.metadata),
        ] {
            for key in map.keys() {
                builder.push_record([format!("{}.{}", section, key), display_field(map, key)]);
            }
        }

        render(builder)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Field value for a table cell; strings unquoted, absent values as `-`.
fn display_field(map: &FieldMap, key: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
