//! 业务逻辑服务层

mod account_store;

pub use account_store::AccountStore;

use std::sync::Arc;

use crate::traits::PersistenceBackend;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "accounts";

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
#[derive(Clone)]
pub struct StoreContext {
    /// Key-value slot holding the serialized collection
    pub backend: Arc<dyn PersistenceBackend>,
    /// Fixed key the whole collection lives under
    pub storage_key: String,
}

impl StoreContext {
    /// Create a context using [`DEFAULT_STORAGE_KEY`]
    #[must_use]
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        Self {
            backend,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn PersistenceBackend> {
        &self.backend
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
