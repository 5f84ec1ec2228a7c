//! Storage layer and change-notification abstraction trait definitions

mod persistence_backend;
mod store_observer;

pub use persistence_backend::{InMemoryBackend, PersistenceBackend};
pub use store_observer::{StoreEvent, StoreObserver, SubscriptionId};
