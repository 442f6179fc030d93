//! Durable JSON writes

use crate::StoreError;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize `value` as pretty JSON and replace `path` with it.
///
/// The bytes go to a sibling `*.tmp` file first and are renamed over `path`,
/// so readers see either the previous document or the new one.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = tmp_path(path);

    // A partial temp file is removed whichever step failed
    fs::write(&tmp, &bytes)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StoreError::Persistence {
                path: path.to_path_buf(),
                source,
            }
        })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("solmaint"));
    name.push(".tmp");
    path.with_file_name(name)
}
