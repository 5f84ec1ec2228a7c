#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder` and the file-backed store.

use std::path::Path;
use std::sync::{Arc, Mutex};

use account_store_app::{AppConfig, AppStateBuilder};
use account_store_core::error::StoreError;
use account_store_core::traits::{InMemoryBackend, StoreEvent, StoreObserver};
use account_store_core::types::{Account, AccountId, AccountLabel, AccountPatch, AccountType};
use serde_json::Value;

fn config_with_file(path: &Path) -> AppConfig {
    AppConfig {
        data_file: Some(path.to_path_buf()),
        ..AppConfig::default()
    }
}

/// Parse the account array out of a store file.
fn read_stored_accounts(path: &Path, key: &str) -> Vec<Value> {
    let file: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let raw = file[key].as_str().expect("key holds a string");
    serde_json::from_str(raw).unwrap()
}

struct CountingObserver {
    events: Mutex<Vec<StoreEvent>>,
}

impl StoreObserver for CountingObserver {
    fn on_change(&self, event: &StoreEvent, _accounts: &[Account]) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[test]
fn build_with_missing_file_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("store.json");

    let state = AppStateBuilder::new()
        .config(config_with_file(&path))
        .build()
        .unwrap();

    assert!(state.store.is_empty());
    assert_eq!(state.ctx().storage_key(), "accounts");
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn valid_account_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("store.json");

    let id = {
        let mut state = AppStateBuilder::new()
            .config(config_with_file(&path))
            .build()
            .unwrap();
        let id = state.store.add();
        state.store.update(
            &id,
            AccountPatch::new()
                .login("alice")
                .password("secret")
                .labels(AccountLabel::parse_list("dev; ops")),
        );
        id
    };

    let stored = read_stored_accounts(&path, "accounts");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["login"], "alice");
    assert!(stored[0].get("errors").is_none());

    let state = AppStateBuilder::new()
        .config(config_with_file(&path))
        .build()
        .unwrap();
    let account = state.store.get(&id).expect("account reloaded");
    assert_eq!(account.login, "alice");
    assert_eq!(account.labels.len(), 2);
    assert!(account.errors.is_empty());
}

#[test]
fn invalid_accounts_are_not_written() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store.json");

    let mut state = AppStateBuilder::new()
        .config(config_with_file(&path))
        .build()
        .unwrap();
    let keep = state.store.add();
    state
        .store
        .update(&keep, AccountPatch::new().account_type(AccountType::Ldap).login("bob"));
    let blank = state.store.add();
    state.store.update(&blank, AccountPatch::new().login(""));

    assert_eq!(state.store.len(), 2);
    let stored = read_stored_accounts(&path, "accounts");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["type"], "LDAP");
    assert_eq!(stored[0]["password"], Value::Null);
}

#[test]
fn custom_storage_key_leaves_other_keys_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store.json");
    std::fs::write(&path, r#"{"other": "untouched"}"#).unwrap();

    let config = AppConfig {
        storage_key: "people".to_string(),
        ..config_with_file(&path)
    };
    let mut state = AppStateBuilder::new().config(config).build().unwrap();
    let id = state.store.add();
    state
        .store
        .update(&id, AccountPatch::new().login("carol").password("pw"));

    let file: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(file["other"], "untouched");
    assert_eq!(read_stored_accounts(&path, "people").len(), 1);
}

#[test]
fn backend_override_is_used() {
    let raw = r#"[{"id": 7, "labels": [], "type": "LOCAL", "login": "dave", "password": "pw"}]"#;
    let backend = Arc::new(InMemoryBackend::with_entry("accounts", raw));

    let state = AppStateBuilder::new().backend(backend).build().unwrap();

    assert_eq!(state.store.len(), 1);
    assert!(state.store.get(&AccountId::new("7")).is_some());
}

#[test]
fn observers_see_changes_but_not_the_load() {
    let raw = r#"[{"id": "a", "labels": [], "type": "LDAP", "login": "eve", "password": null}]"#;
    let observer = Arc::new(CountingObserver {
        events: Mutex::new(Vec::new()),
    });

    let mut state = AppStateBuilder::new()
        .backend(Arc::new(InMemoryBackend::with_entry("accounts", raw)))
        .observer(observer.clone())
        .build()
        .unwrap();
    assert!(observer.events.lock().unwrap().is_empty());

    state.store.remove(&AccountId::new("a"));
    let events = observer.events.lock().unwrap().clone();
    assert_eq!(events, vec![StoreEvent::Removed(AccountId::new("a"))]);
}

#[test]
fn corrupt_store_file_starts_empty_and_is_replaced_on_save() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut state = AppStateBuilder::new()
        .config(config_with_file(&path))
        .build()
        .unwrap();
    assert!(state.store.is_empty());

    let id = state.store.add();
    state
        .store
        .update(&id, AccountPatch::new().login("frank").password("pw"));
    assert_eq!(read_stored_accounts(&path, "accounts").len(), 1);
}

#[test]
fn blank_storage_key_is_rejected() {
    let config = AppConfig {
        storage_key: "  ".to_string(),
        ..AppConfig::default()
    };
    let result = AppStateBuilder::new()
        .config(config)
        .backend(Arc::new(InMemoryBackend::new()))
        .build();
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn config_file_is_loaded_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.toml");
    std::fs::write(
        &config_path,
        "storage_key = \"team\"\nlog_filter = \"debug\"\n",
    )
    .unwrap();

    let config = AppConfig::load(Some(&config_path)).unwrap();
    assert_eq!(config.storage_key, "team");
    assert_eq!(config.log_filter, "debug");

    std::fs::write(&config_path, "storage_key = [").unwrap();
    assert!(matches!(
        AppConfig::load(Some(&config_path)),
        Err(StoreError::Config(_))
    ));
}
