//! Thread-safe handle around a JsonStore

use crate::{JsonStore, StoreError};
use solmaint_domain::traits::ExtractionStore;
use solmaint_domain::{ExtractionId, ExtractionRecord, ExtractionStatistics, FieldMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle that serializes access to one [`JsonStore`].
///
/// Computing the next version, appending, and rewriting the collection file
/// happen under a single lock, so concurrent callers in one process never
/// receive the same version. Separate processes are not coordinated.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<JsonStore>>,
}

impl SharedStore {
    /// Wrap an opened store
    pub fn new(store: JsonStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, JsonStore>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// See [`ExtractionStore::save_extraction`]
    pub fn save_extraction(
        &self,
        source_file: &str,
        data: FieldMap,
        extras: Option<FieldMap>,
    ) -> Result<ExtractionId, StoreError> {
        self.lock()?.save_extraction(source_file, data, extras)
    }

    /// See [`ExtractionStore::save_extraction_with_metadata`]
    pub fn save_extraction_with_metadata(
        &self,
        source_file: &str,
        data: FieldMap,
        extras: Option<FieldMap>,
        metadata: FieldMap,
    ) -> Result<ExtractionId, StoreError> {
        self.lock()?
            .save_extraction_with_metadata(source_file, data, extras, metadata)
    }

    /// Owned copy of the record with `id`
    pub fn get_extraction_by_id(&self, id: &str) -> Result<Option<ExtractionRecord>, StoreError> {
        Ok(self.lock()?.get_extraction_by_id(id).cloned())
    }

    /// Owned copy of the history for `source_file`
    pub fn get_extraction_history(
        &self,
        source_file: &str,
    ) -> Result<Vec<ExtractionRecord>, StoreError> {
        Ok(self
            .lock()?
            .get_extraction_history(source_file)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Owned copy of the latest record for `source_file`
    pub fn get_latest_extraction(
        &self,
        source_file: &str,
    ) -> Result<Option<ExtractionRecord>, StoreError> {
        Ok(self.lock()?.get_latest_extraction(source_file).cloned())
    }

    /// Snapshot of all records
    pub fn get_all_extractions(&self) -> Result<Vec<ExtractionRecord>, StoreError> {
        Ok(self.lock()?.get_all_extractions().to_vec())
    }

    /// Current statistics
    pub fn get_statistics(&self) -> Result<ExtractionStatistics, StoreError> {
        Ok(self.lock()?.get_statistics())
    }

    /// See [`ExtractionStore::export_audit_trail`]
    pub fn export_audit_trail(&self, destination: &Path) -> Result<(), StoreError> {
        self.lock()?.export_audit_trail(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_concurrent_saves_get_distinct_versions() {
        let dir = tempfile::tempdir().unwrap();
        let shared = SharedStore::new(JsonStore::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = shared.clone();
                thread::spawn(move || {
                    for i in 0..5 {
                        let mut data = FieldMap::new();
                        data.insert("supplier_name".into(), json!(format!("w{worker}-{i}")));
                        store.save_extraction("shared.pdf", data, None).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let history = shared.get_extraction_history("shared.pdf").unwrap();
        let versions: Vec<u32> = history.iter().map(|r| r.version).collect();
        assert_eq!(versions, (1..=40).collect::<Vec<u32>>());

        let ids: HashSet<_> = history.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 40);
    }

    #[test]
    fn test_shared_reads_return_owned_copies() {
        let dir = tempfile::tempdir().unwrap();
        let shared = SharedStore::new(JsonStore::open(dir.path()).unwrap());

        let id = shared.save_extraction("a.pdf", FieldMap::new(), None).unwrap();

        let record = shared.get_extraction_by_id(id.as_str()).unwrap().unwrap();
        assert_eq!(record.version, 1);
        assert_eq!(shared.get_latest_extraction("a.pdf").unwrap(), Some(record));
        assert!(shared.get_extraction_by_id("nonexistent").unwrap().is_none());
        assert_eq!(shared.get_statistics().unwrap().total_extractions, 1);
    }
}
