//! Persistence backend abstract Trait

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{StoreError, StoreResult};

/// Key -> string storage slot used by `AccountStore`.
///
/// The store reads one fixed key at startup and overwrites it on every
/// persistence point. Writes are fire-and-forget from the store's point of
/// view: an `Err` from `set` is logged, never retried.
///
/// Platform implementation:
/// - Tests / ephemeral sessions: `InMemoryBackend`
/// - Desktop / CLI: `JsonFileBackend` (account-store-app)
pub trait PersistenceBackend: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` - value present
    /// * `Ok(None)` - nothing stored yet
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the value stored under `key`
    ///
    /// # Arguments
    /// * `key` - storage key
    /// * `value` - raw string, usually JSON
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// In-memory persistence backend
///
/// Default implementation, available on all platforms. Clones share the
/// same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with one entry
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl PersistenceBackend for InMemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Storage(format!("Backend lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|e| StoreError::Storage(format!("Backend lock poisoned: {e}")))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.get("accounts").unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_clones_share_state() {
        let backend = InMemoryBackend::with_entry("accounts", "[]");
        let clone = backend.clone();

        clone.set("accounts", "[1]").unwrap();

        assert_eq!(backend.get("accounts").unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.get("other").unwrap(), None);
    }
}
