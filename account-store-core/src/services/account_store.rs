//! Account store
//!
//! Owns the in-memory account collection and every read/write of the
//! persistence slot. Invalid accounts may live in memory while the user is
//! still editing them; only valid ones ever reach the backend.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::StoreError;
use crate::services::StoreContext;
use crate::traits::{StoreEvent, StoreObserver, SubscriptionId};
use crate::types::{Account, AccountErrors, AccountId, AccountPatch};
use crate::validation::{compute_errors, is_valid};

/// Account store
pub struct AccountStore {
    ctx: StoreContext,
    accounts: Vec<Account>,
    observers: Vec<(SubscriptionId, Arc<dyn StoreObserver>)>,
    next_subscription: u64,
}

impl AccountStore {
    /// Create the store and load the persisted collection.
    ///
    /// Loading happens exactly once, here. Nothing that goes wrong while
    /// loading is reported to the caller: an unreadable or malformed slot
    /// leaves the store empty.
    #[must_use]
    pub fn open(ctx: StoreContext) -> Self {
        let mut store = Self {
            ctx,
            accounts: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        store
    }

    #[must_use]
    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    // ===== Read access =====

    /// The whole collection, in display order
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    #[must_use]
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    // ===== Subscriptions =====

    /// Register an observer, notified after every mutating operation
    pub fn subscribe(&mut self, observer: Arc<dyn StoreObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if the subscription was already gone
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    // ===== CRUD operations =====

    /// Append a blank `LOCAL` account.
    ///
    /// Not validated and not persisted: a blank account is invalid and would
    /// be filtered out of the snapshot anyway.
    pub fn add(&mut self) -> AccountId {
        let id = self.fresh_id();
        self.accounts.push(Account::blank(id.clone()));
        log::debug!("Added account {id}");
        self.notify(&StoreEvent::Added(id.clone()));
        id
    }

    /// Remove an account and persist the collection.
    ///
    /// Unknown ids are not an error; the collection is persisted regardless.
    pub fn remove(&mut self, id: &AccountId) {
        let before = self.accounts.len();
        self.accounts.retain(|a| &a.id != id);
        let removed = self.accounts.len() != before;

        self.save();

        if removed {
            log::info!("Removed account {id}");
            self.notify(&StoreEvent::Removed(id.clone()));
        } else {
            log::debug!("Remove ignored, no account {id}");
        }
    }

    /// Merge `patch` into an account, then validate it (which persists).
    ///
    /// Unknown ids are ignored.
    pub fn update(&mut self, id: &AccountId, patch: AccountPatch) {
        let Some(account) = self.accounts.iter_mut().find(|a| &a.id == id) else {
            log::debug!("Update ignored, no account {id}");
            return;
        };
        account.apply(patch);

        if let Some(valid) = self.refresh_errors(id) {
            self.notify(&StoreEvent::Updated {
                id: id.clone(),
                valid,
            });
        }
    }

    /// Recompute an account's error flags and persist the collection.
    ///
    /// Returns `true` iff the account exists and has no error flag set.
    /// Unknown ids return `false` without touching anything.
    pub fn validate(&mut self, id: &AccountId) -> bool {
        let Some(valid) = self.refresh_errors(id) else {
            return false;
        };
        self.notify(&StoreEvent::Validated {
            id: id.clone(),
            valid,
        });
        valid
    }

    // ===== Persistence =====

    /// Write every valid account to the backend, without error flags.
    ///
    /// Invalid accounts stay in memory and are picked up by a later save once
    /// they become valid. A failed write is logged and otherwise ignored.
    pub fn save(&self) {
        let valid: Vec<&Account> = self.accounts.iter().filter(|a| is_valid(a)).collect();

        let json = match serde_json::to_string(&valid) {
            Ok(json) => json,
            Err(e) => {
                log_backend_error("serialize accounts", &StoreError::from(e));
                return;
            }
        };

        if let Err(e) = self.ctx.backend().set(self.ctx.storage_key(), &json) {
            log_backend_error("persist accounts", &e);
            return;
        }

        log::debug!(
            "Persisted {} of {} accounts",
            valid.len(),
            self.accounts.len()
        );
    }

    /// Replace the collection with the valid accounts found in the slot.
    ///
    /// - absent slot: collection untouched
    /// - slot not a JSON array: collection untouched
    /// - element not shaped like an account, invalid, or with an id seen
    ///   earlier in the array: dropped
    ///
    /// Survivors get cleared error flags rather than recomputed ones. That
    /// is a known divergence from `validate` and is kept as is.
    fn load(&mut self) {
        let key = self.ctx.storage_key();
        let raw = match self.ctx.backend().get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No stored accounts under key '{key}'");
                return;
            }
            Err(e) => {
                log_backend_error("read stored accounts", &e);
                return;
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Stored accounts under key '{key}' are malformed, ignoring them: {e}");
                return;
            }
        };

        let total = records.len();
        let mut loaded: Vec<Account> = Vec::with_capacity(total);
        let mut seen: HashSet<AccountId> = HashSet::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            let mut account: Account = match serde_json::from_value(record) {
                Ok(account) => account,
                Err(e) => {
                    log::warn!("Dropping stored account #{index}: {e}");
                    continue;
                }
            };
            if !is_valid(&account) {
                log::warn!("Dropping invalid stored account {}", account.id);
                continue;
            }
            if !seen.insert(account.id.clone()) {
                log::warn!("Dropping duplicate stored account {}", account.id);
                continue;
            }
            account.errors = AccountErrors::default();
            loaded.push(account);
        }

        log::info!("Loaded {} of {total} stored accounts", loaded.len());
        self.accounts = loaded;
    }

    // ===== Internals =====

    /// Recompute the flags of `id`, persist, and report validity.
    /// `None` if the account does not exist.
    fn refresh_errors(&mut self, id: &AccountId) -> Option<bool> {
        let account = self.accounts.iter_mut().find(|a| &a.id == id)?;
        let errors = compute_errors(account);
        account.errors = errors;

        self.save();
        Some(errors.is_empty())
    }

    fn fresh_id(&self) -> AccountId {
        loop {
            let id = AccountId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn notify(&self, event: &StoreEvent) {
        for (_, observer) in &self.observers {
            observer.on_change(event, &self.accounts);
        }
    }
}

fn log_backend_error(action: &str, e: &StoreError) {
    if e.is_expected() {
        log::warn!("Failed to {action}: {e}");
    } else {
        log::error!("Failed to {action}: {e}");
    }
}
