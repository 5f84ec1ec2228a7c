//! Platform-agnostic application bootstrap for the account store.
//!
//! Provides `AppConfig` (TOML configuration), `AppState` (store container)
//! and `AppStateBuilder` (adapter injection).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use account_store_core::error::{StoreError, StoreResult};
use account_store_core::services::{AccountStore, StoreContext};
use account_store_core::traits::{PersistenceBackend, StoreObserver};

use crate::adapters::JsonFileBackend;
pub use crate::config::AppConfig;

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Configuration the state was built from
    pub config: AppConfig,
    /// The account collection, already loaded from persistence
    pub store: AccountStore,
}

impl AppState {
    /// Shared context (backend + storage key) of the store
    #[must_use]
    pub fn ctx(&self) -> &StoreContext {
        self.store.context()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Optional
/// - `config`: defaults to `AppConfig::default()`
/// - `backend`: defaults to a `JsonFileBackend` at the configured data file
/// - `observer`: may be called several times
pub struct AppStateBuilder {
    config: AppConfig,
    backend: Option<Arc<dyn PersistenceBackend>>,
    observers: Vec<Arc<dyn StoreObserver>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            backend: None,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn PersistenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the `AppState`, running the store's one-time load.
    ///
    /// Observers are registered after the load, so they never see it.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the configured storage key is blank.
    pub fn build(self) -> StoreResult<AppState> {
        if self.config.storage_key.trim().is_empty() {
            return Err(StoreError::Config("storage_key must not be empty".to_string()));
        }

        let backend = self.backend.unwrap_or_else(|| {
            let file_backend = JsonFileBackend::new(self.config.resolved_data_file());
            log::info!("Using store file {}", file_backend.path().display());
            Arc::new(file_backend) as Arc<dyn PersistenceBackend>
        });

        let ctx = StoreContext::new(backend).with_storage_key(self.config.storage_key.clone());
        let mut store = AccountStore::open(ctx);
        for observer in self.observers {
            store.subscribe(observer);
        }

        Ok(AppState {
            config: self.config,
            store,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
