//! JSON file persistence backend.
//!
//! The file holds one JSON object mapping each storage key to its raw
//! string value, e.g. `{"accounts": "[{\"id\":\"1\",...}]"}`. It plays the
//! role browser local storage plays for a web frontend.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use account_store_core::error::{StoreError, StoreResult};
use account_store_core::traits::PersistenceBackend;

const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

type Entries = HashMap<String, String>;

/// Key-value backend stored in a single JSON file.
///
/// Entries are read once and cached; every `set` rewrites the whole file
/// through a temporary file and a rename, so a crash mid-write leaves the
/// previous content intact.
pub struct JsonFileBackend {
    path: PathBuf,
    /// 内存缓存
    cache: Arc<RwLock<Option<Entries>>>,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::debug!("JSON store file: {}", path.display());
        Self {
            path,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load entries from the file. A missing file is an empty store.
    fn load_from_file(&self) -> StoreResult<Entries> {
        if !self.path.exists() {
            log::debug!("Store file does not exist: {}", self.path.display());
            return Ok(HashMap::new());
        }

        let metadata = fs::metadata(&self.path).map_err(|e| {
            StoreError::Storage(format!("Failed to read store file metadata: {e}"))
        })?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(StoreError::Storage(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Storage(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("Invalid store format: {e}")))
    }

    fn save_to_file(&self, entries: &Entries) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Storage(format!("Failed to create directory: {e}"))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| StoreError::Storage(format!("Failed to write store file: {e}")))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| StoreError::Storage(format!("Failed to replace store file: {e}")))?;

        log::debug!("Saved {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Make sure the cache is populated inside the write lock and hand it out.
    ///
    /// Only a file whose content is not a key-value object is replaced by an
    /// empty map. I/O failures and oversized files are returned, so other
    /// keys are never overwritten with nothing.
    fn ensure_cache_loaded<'a>(
        &self,
        cache: &'a mut Option<Entries>,
    ) -> StoreResult<&'a mut Entries> {
        if cache.is_none() {
            let entries = match self.load_from_file() {
                Ok(entries) => entries,
                Err(StoreError::Serialization(e)) => {
                    log::warn!("Discarding malformed store file {}: {e}", self.path.display());
                    HashMap::new()
                }
                Err(e) => return Err(e),
            };
            *cache = Some(entries);
        }
        Ok(cache.get_or_insert_with(HashMap::new))
    }
}

impl PersistenceBackend for JsonFileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|e| StoreError::Storage(format!("Store cache lock poisoned: {e}")))?;
            if let Some(ref entries) = *cache {
                return Ok(entries.get(key).cloned());
            }
        }

        let mut cache = self
            .cache
            .write()
            .map_err(|e| StoreError::Storage(format!("Store cache lock poisoned: {e}")))?;
        if let Some(ref entries) = *cache {
            return Ok(entries.get(key).cloned());
        }

        let entries = self.load_from_file()?;
        let value = entries.get(key).cloned();
        *cache = Some(entries);
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| StoreError::Storage(format!("Store cache lock poisoned: {e}")))?;
        let entries = self.ensure_cache_loaded(&mut cache)?;

        entries.insert(key.to_string(), value.to_string());
        self.save_to_file(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(tmp.path().join("store.json"));
        assert_eq!(backend.get("accounts").unwrap(), None);
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(
            backend.get("accounts"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn set_over_malformed_file_starts_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        backend.set("accounts", "[]").unwrap();

        let reopened = JsonFileBackend::new(&path);
        assert_eq!(reopened.get("accounts").unwrap().as_deref(), Some("[]"));
    }
}
