//! Extraction records - the unit of the version-tracked store

use crate::{ExtractionStatistics, Timestamp};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Field name → value mapping used for `data`, `extras` and `metadata`.
///
/// The store treats these as opaque; insertion order is preserved on disk.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Unique identifier for an extraction record
///
/// Generated from a UUIDv7, so identifiers are random enough to never collide
/// in practice and still sort roughly by creation time. Held as a string so that
/// collections written by other tools (any opaque id) still load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionId(String);

impl ExtractionId {
    /// Generate a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use solmaint_domain::ExtractionId;
    ///
    /// let a = ExtractionId::new();
    /// let b = ExtractionId::new();
    /// assert_ne!(a, b);
    /// assert_eq!(a.as_str().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an identifier read from an external source
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExtractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExtractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtractionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One stored extraction.
///
/// Records are immutable once created; a re-extraction of the same document is a
/// new record carrying the next `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Unique identifier, never reassigned
    pub id: ExtractionId,

    /// Originating document; the versioning scope key
    pub source_file: String,

    /// When the record was created
    pub extracted_at: Timestamp,

    /// Position in the source file's history, starting at 1
    pub version: u32,

    /// Validated fields
    pub data: FieldMap,

    /// Unstructured fields that did not map onto the schema
    #[serde(default)]
    pub extras: FieldMap,

    /// Provenance (model used, file size, processing time)
    #[serde(default)]
    pub metadata: FieldMap,
}

impl ExtractionRecord {
    /// Create a new record
    pub fn new(
        id: ExtractionId,
        source_file: impl Into<String>,
        extracted_at: Timestamp,
        version: u32,
        data: FieldMap,
        extras: FieldMap,
        metadata: FieldMap,
    ) -> Self {
        Self {
            id,
            source_file: source_file.into(),
            extracted_at,
            version,
            data,
            extras,
            metadata,
        }
    }
}

/// The full durable state of a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionCollection {
    /// Set once, when the empty collection was first initialized
    pub created_at: Timestamp,

    /// Records in append order
    #[serde(default)]
    pub extractions: Vec<ExtractionRecord>,
}

impl ExtractionCollection {
    /// Fresh, empty collection stamped with the current time
    pub fn new() -> Self {
        Self {
            created_at: Timestamp::now(),
            extractions: Vec::new(),
        }
    }
}

impl Default for ExtractionCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot written by an audit export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail<'a> {
    /// When the snapshot was taken
    pub exported_at: Timestamp,

    /// Statistics at export time
    pub statistics: ExtractionStatistics,

    /// Every record, in append order
    pub extractions: Cow<'a, [ExtractionRecord]>,
}

impl<'a> AuditTrail<'a> {
    /// Build a snapshot over the given records
    pub fn snapshot(records: &'a [ExtractionRecord]) -> Self {
        Self {
            exported_at: Timestamp::now(),
            statistics: ExtractionStatistics::from_records(records),
            extractions: Cow::Borrowed(records),
        }
    }
}

/// Typed builder for the well-known provenance keys of a record's metadata
///
/// Only the keys that were set are written, so a partially known provenance
/// still round-trips through the opaque [`FieldMap`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Model that produced the extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,

    /// Size of the source document in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Wall-clock time spent on the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl RecordMetadata {
    /// Empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model name
    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }

    /// Set the source file size
    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    /// Set the processing time
    pub fn with_processing_time_ms(mut self, millis: u64) -> Self {
        self.processing_time_ms = Some(millis);
        self
    }

    /// Flatten into the map stored on the record
    pub fn into_field_map(self) -> FieldMap {
        let mut map = FieldMap::new();
        if let Some(model) = self.llm_model {
            map.insert("llm_model".into(), serde_json::Value::String(model));
        }
        if let Some(bytes) = self.file_size {
            map.insert("file_size".into(), bytes.into());
        }
        if let Some(millis) = self.processing_time_ms {
            map.insert("processing_time_ms".into(), millis.into());
        }
        map
    }
}

impl From<RecordMetadata> for FieldMap {
    fn from(metadata: RecordMetadata) -> Self {
        metadata.into_field_map()
    }
}
