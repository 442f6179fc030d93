//! Aggregate statistics over a set of extraction records

use crate::{ExtractionRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary counts reported by the store and embedded in audit exports.
///
/// An empty store yields all-zero counts and no timestamp; that is a normal
/// state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStatistics {
    /// Number of records
    pub total_extractions: usize,

    /// Number of distinct source files
    pub unique_files: usize,

    /// Most recent `extracted_at`, absent when there are no records
    pub latest_extraction_timestamp: Option<Timestamp>,

    /// Number of source files with more than one version
    pub files_with_multiple_versions: usize,
}

impl ExtractionStatistics {
    /// Compute statistics in a single pass over `records`
    pub fn from_records(records: &[ExtractionRecord]) -> Self {
        let mut per_file: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *per_file.entry(record.source_file.as_str()).or_default() += 1;
        }

        Self {
            total_extractions: records.len(),
            unique_files: per_file.len(),
            latest_extraction_timestamp: records.iter().map(|r| &r.extracted_at).max().cloned(),
            files_with_multiple_versions: per_file.values().filter(|&&n| n > 1).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionId, FieldMap};

    fn record_at(source_file: &str, version: u32, at: &str) -> ExtractionRecord {
        ExtractionRecord::new(
            ExtractionId::new(),
            source_file,
            Timestamp::parse(at).unwrap(),
            version,
            FieldMap::new(),
            FieldMap::new(),
            FieldMap::new(),
        )
    }

    #[test]
    fn test_empty_statistics() {
        let stats = ExtractionStatistics::from_records(&[]);
        assert_eq!(stats, ExtractionStatistics::default());
        assert!(stats.latest_extraction_timestamp.is_none());
    }

    #[test]
    fn test_statistics_counts() {
        let records = vec![
            record_at("a.pdf", 1, "2024-01-01T00:00:00Z"),
            record_at("a.pdf", 2, "2024-03-01T00:00:00Z"),
            record_at("b.pdf", 1, "2024-02-01T00:00:00Z"),
        ];
        let stats = ExtractionStatistics::from_records(&records);

        assert_eq!(stats.total_extractions, 3);
        assert_eq!(stats.unique_files, 2);
        assert_eq!(stats.files_with_multiple_versions, 1);
        assert_eq!(
            stats.latest_extraction_timestamp.unwrap().to_string(),
            "2024-03-01T00:00:00Z"
        );
    }

    #[test]
    fn test_latest_timestamp_ignores_append_order() {
        let records = vec![
            record_at("b.pdf", 1, "2025-06-01T00:00:00Z"),
            record_at("a.pdf", 1, "2024-01-01T00:00:00Z"),
        ];
        let stats = ExtractionStatistics::from_records(&records);
        assert_eq!(
            stats.latest_extraction_timestamp,
            Some(Timestamp::parse("2025-06-01T00:00:00Z").unwrap())
        );
    }
}
