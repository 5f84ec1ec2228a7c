//! Account Store Core Library
//!
//! Keeps an in-memory collection of login accounts synchronized with a
//! single key-value persistence slot:
//! - Validity rules shared by persistence filtering and UI error flags
//! - CRUD over the collection, with change notification
//! - Load/save round-trip that only ever persists valid accounts
//!
//! This library is platform-independent: storage is abstracted through the
//! `PersistenceBackend` trait and views observe the store through
//! `StoreObserver`.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{StoreError, StoreResult};
pub use services::{AccountStore, StoreContext, DEFAULT_STORAGE_KEY};
pub use traits::{InMemoryBackend, PersistenceBackend, StoreEvent, StoreObserver, SubscriptionId};
pub use types::{Account, AccountErrors, AccountId, AccountLabel, AccountPatch, AccountType};
pub use validation::{compute_errors, is_valid, MAX_FIELD_LENGTH};
