//! Solmaint Storage Layer
//!
//! Implements the `ExtractionStore` trait on top of plain JSON files.
//!
//! # Layout
//!
//! - `<location>/extractions.json`: the authoritative collection
//!   (`{created_at, extractions: [...]}`), fully rewritten on every save
//! - `<location>/<id>.json`: a convenience copy of each record, never read back
//!
//! # Guarantees
//!
//! - Versions for a source file are `1..=k`, assigned as `max + 1`
//! - Ids are unique across the collection
//! - Records are append-only
//! - A failed save leaves the in-memory collection as it was before the call
//!
//! There is no cross-process locking: two processes saving into the same
//! location can assign the same version. Use [`SharedStore`] to serialize
//! writers inside one process.
//!
//! # Examples
//!
//! ```no_run
//! use solmaint_domain::traits::ExtractionStore;
//! use solmaint_domain::FieldMap;
//! use solmaint_store::JsonStore;
//!
//! let mut store = JsonStore::open("output").unwrap();
//! let id = store.save_extraction("inverter.pdf", FieldMap::new(), None).unwrap();
//! assert_eq!(store.get_extraction_by_id(id.as_str()).unwrap().version, 1);
//! ```

#![warn(missing_docs)]

mod persist;
mod shared;

pub use shared::SharedStore;

use solmaint_domain::traits::ExtractionStore;
use solmaint_domain::{
    AuditTrail, ExtractionCollection, ExtractionId, ExtractionRecord, FieldMap, Timestamp,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// File name of the authoritative collection inside the store location
pub const COLLECTION_FILE: &str = "extractions.json";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A durable write did not complete
    #[error("Persistence failure at {}: {source}", path.display())]
    Persistence {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Source file identifier was empty
    #[error("Invalid source file: {0:?}")]
    InvalidSourceFile(String),

    /// A shared store's lock was poisoned by a panicking writer
    #[error("Store lock poisoned: {0}")]
    Lock(String),

    /// The source file already holds the highest representable version
    #[error("Version limit reached for {0:?}")]
    VersionOverflow(String),
}

/// JSON-file implementation of ExtractionStore
///
/// The whole collection lives in memory and is rewritten to disk on every
/// save. Queries are linear scans.
///
/// # Thread Safety
///
/// Saving needs `&mut self`, so one owner is the only writer. Wrap the store in
/// a [`SharedStore`] to share it between threads.
#[derive(Debug)]
pub struct JsonStore {
    location: PathBuf,
    collection: ExtractionCollection,
    default_metadata: FieldMap,
}

impl JsonStore {
    /// Open (or create) a store rooted at `location`
    ///
    /// An existing collection that cannot be parsed is replaced by an empty
    /// one with a warning; nothing is written until the next save.
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self, StoreError> {
        let location = location.as_ref().to_path_buf();
        fs::create_dir_all(&location).map_err(|source| StoreError::Persistence {
            path: location.clone(),
            source,
        })?;

        let collection = load_collection(&location.join(COLLECTION_FILE));

        Ok(Self {
            location,
            collection,
            default_metadata: FieldMap::new(),
        })
    }

    /// Record `model_name` as `llm_model` in the metadata of every new record
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.default_metadata.insert(
            "llm_model".to_string(),
            serde_json::Value::String(model_name.into()),
        );
        self
    }

    /// Directory the store lives in
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Path of the authoritative collection file
    pub fn collection_path(&self) -> PathBuf {
        self.location.join(COLLECTION_FILE)
    }

    /// Path of the per-record copy for `id`
    pub fn record_path(&self, id: &ExtractionId) -> PathBuf {
        self.location.join(format!("{}.json", id))
    }

    /// When the collection was first initialized
    pub fn created_at(&self) -> Timestamp {
        self.collection.created_at.clone()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.collection.extractions.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.collection.extractions.is_empty()
    }

    /// Next version for `source_file`: one past the highest present version
    ///
    /// Fails with `VersionOverflow` if a loaded history already holds `u32::MAX`.
    pub fn next_version(&self, source_file: &str) -> Result<u32, StoreError> {
        self.collection
            .extractions
            .iter()
            .filter(|r| r.source_file == source_file)
            .map(|r| r.version)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| StoreError::VersionOverflow(source_file.to_string()))
    }

    fn fresh_id(&self) -> ExtractionId {
        loop {
            let id = ExtractionId::new();
            if self.get_extraction_by_id(id.as_str()).is_none() {
                return id;
            }
        }
    }

    fn persist_collection(&self) -> Result<(), StoreError> {
        persist::write_json_atomic(&self.collection_path(), &self.collection)
    }

    /// Best-effort copy of a single record; failures are only logged
    fn persist_record(&self, record: &ExtractionRecord) {
        let path = self.record_path(&record.id);
        if let Err(e) = persist::write_json_atomic(&path, record) {
            warn!(id = %record.id, error = %e, "Failed to write individual extraction copy");
        }
    }
}

impl ExtractionStore for JsonStore {
    type Error = StoreError;

    fn save_extraction_with_metadata(
        &mut self,
        source_file: &str,
        data: FieldMap,
        extras: Option<FieldMap>,
        metadata: FieldMap,
    ) -> Result<ExtractionId, Self::Error> {
        if source_file.trim().is_empty() {
            return Err(StoreError::InvalidSourceFile(source_file.to_string()));
        }

        let version = self.next_version(source_file)?;
        let id = self.fresh_id();

        let mut merged = self.default_metadata.clone();
        merged.extend(metadata);

        let record = ExtractionRecord::new(
            id.clone(),
            source_file,
            Timestamp::now(),
            version,
            data,
            extras.unwrap_or_default(),
            merged,
        );

        self.collection.extractions.push(record);

        if let Err(e) = self.persist_collection() {
            // Roll back so memory matches the last successful write
            self.collection.extractions.pop();
            error!(source_file, error = %e, "Failed to save extractions");
            return Err(e);
        }

        if let Some(record) = self.collection.extractions.last() {
            self.persist_record(record);
        }

        info!(%id, source_file, version, "Saved extraction");
        Ok(id)
    }

    fn get_extraction_by_id(&self, id: &str) -> Option<&ExtractionRecord> {
        self.collection
            .extractions
            .iter()
            .find(|r| r.id.as_str() == id)
    }

    fn get_extraction_history(&self, source_file: &str) -> Vec<&ExtractionRecord> {
        let mut history: Vec<&ExtractionRecord> = self
            .collection
            .extractions
            .iter()
            .filter(|r| r.source_file == source_file)
            .collect();
        history.sort_by_key(|r| r.version);
        history
    }

    fn get_all_extractions(&self) -> &[ExtractionRecord] {
        &self.collection.extractions
    }

    fn export_audit_trail(&self, destination: &Path) -> Result<(), Self::Error> {
        let trail = AuditTrail::snapshot(&self.collection.extractions);
        persist::write_json_atomic(destination, &trail).inspect_err(|e| {
            error!(destination = %destination.display(), error = %e, "Failed to export audit trail");
        })?;
        info!(
            destination = %destination.display(),
            records = trail.extractions.len(),
            "Exported audit trail"
        );
        Ok(())
    }
}

/// Load the collection at `path`, falling back to a fresh one.
///
/// A missing file is the normal first-run case. An unreadable or unparsable
/// file is logged and discarded.
fn load_collection(path: &Path) -> ExtractionCollection {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No existing extractions, starting fresh");
            return ExtractionCollection::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read existing extractions");
            return ExtractionCollection::new();
        }
    };

    match serde_json::from_str::<ExtractionCollection>(&contents) {
        Ok(collection) => {
            info!(
                count = collection.extractions.len(),
                "Loaded existing extractions"
            );
            collection
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Malformed extraction store, starting with an empty collection"
            );
            ExtractionCollection::new()
        }
    }
}
