//! Change notification for views bound to the store.

use crate::types::{Account, AccountId};

/// Handle returned by `AccountStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// What a mutating operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A blank account was appended
    Added(AccountId),
    /// An account was removed and the collection persisted
    Removed(AccountId),
    /// A patch was merged, then the account was validated and persisted
    Updated { id: AccountId, valid: bool },
    /// The account's error flags were recomputed and the collection persisted
    Validated { id: AccountId, valid: bool },
}

impl StoreEvent {
    /// The account the event is about.
    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        match self {
            Self::Added(id)
            | Self::Removed(id)
            | Self::Updated { id, .. }
            | Self::Validated { id, .. } => id,
        }
    }
}

/// Observer notified once at the end of every mutating store operation.
///
/// `accounts` is the whole collection after the change. Observers must not
/// call back into the store: they run while the store is still borrowed.
pub trait StoreObserver: Send + Sync {
    fn on_change(&self, event: &StoreEvent, accounts: &[Account]);
}
