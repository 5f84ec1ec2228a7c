//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde_json::{json, Value};

use crate::error::{StoreError, StoreResult};
use crate::services::{AccountStore, StoreContext};
use crate::traits::{PersistenceBackend, StoreEvent, StoreObserver};
use crate::types::Account;

/// Storage key used by the test factories.
pub const TEST_KEY: &str = "test-accounts";

// ===== MockBackend =====

pub struct MockBackend {
    entries: RwLock<HashMap<String, String>>,
    writes: RwLock<usize>,
    /// 如果 Some，get 时返回此错误
    get_error: RwLock<Option<String>>,
    /// 如果 Some，set 时返回此错误（用于测试 fire-and-forget 路径）
    set_error: RwLock<Option<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            writes: RwLock::new(0),
            get_error: RwLock::new(None),
            set_error: RwLock::new(None),
        }
    }

    pub fn set_get_error(&self, err: Option<String>) {
        *self.get_error.write().unwrap() = err;
    }

    pub fn set_set_error(&self, err: Option<String>) {
        *self.set_error.write().unwrap() = err;
    }

    /// Seed a value without counting it as a write
    pub fn set_raw(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }

    /// The records persisted under [`TEST_KEY`], empty if nothing was written
    pub fn stored_records(&self) -> Vec<Value> {
        self.raw(TEST_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .unwrap_or_default()
    }
}

impl PersistenceBackend for MockBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if let Some(ref msg) = *self.get_error.read().unwrap() {
            return Err(StoreError::Storage(msg.clone()));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(ref msg) = *self.set_error.read().unwrap() {
            return Err(StoreError::Storage(msg.clone()));
        }
        self.set_raw(key, value);
        *self.writes.write().unwrap() += 1;
        Ok(())
    }
}

// ===== RecordingObserver =====

/// Records each event together with the collection size at that moment.
pub struct RecordingObserver {
    events: Mutex<Vec<(StoreEvent, usize)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<(StoreEvent, usize)> {
        self.events.lock().unwrap().clone()
    }
}

impl StoreObserver for RecordingObserver {
    fn on_change(&self, event: &StoreEvent, accounts: &[Account]) {
        self.events
            .lock()
            .unwrap()
            .push((event.clone(), accounts.len()));
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `AccountStore`（空存储）
pub fn create_test_store() -> (AccountStore, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let store = AccountStore::open(StoreContext::new(backend.clone()).with_storage_key(TEST_KEY));
    (store, backend)
}

/// 创建测试用 `AccountStore`，存储中预置原始内容
pub fn create_test_store_with(raw: &str) -> (AccountStore, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    backend.set_raw(TEST_KEY, raw);
    let store = AccountStore::open(StoreContext::new(backend.clone()).with_storage_key(TEST_KEY));
    (store, backend)
}

/// A persisted `LOCAL` record
pub fn local_account(id: &str, login: &str, password: &str) -> Value {
    json!({"id": id, "labels": [], "type": "LOCAL", "login": login, "password": password})
}

/// A persisted `LDAP` record without password
pub fn ldap_account(id: &str, login: &str) -> Value {
    json!({"id": id, "labels": [], "type": "LDAP", "login": login, "password": null})
}

/// A blank record as `AccountStore::add` creates it
pub fn blank_local(id: &str) -> Value {
    local_account(id, "", "")
}
