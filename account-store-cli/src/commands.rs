//! Command execution against an opened store.
//!
//! Every command prints one JSON document to the writer and reports an
//! [`Outcome`] the entry point turns into the process exit code.

use std::io::Write;

use account_store_core::services::AccountStore;
use account_store_core::traits::{StoreEvent, StoreObserver};
use account_store_core::types::{Account, AccountErrors, AccountId, AccountLabel};
use account_store_core::validation::is_valid;
use serde::Serialize;

use crate::cli::Command;

/// Result of a command, independent of its JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The account is left with at least one error flag set
    Invalid,
    NotFound,
}

/// Rendering of an account for the terminal. The password is never shown.
#[derive(Debug, Serialize)]
pub struct AccountView<'a> {
    pub id: &'a str,
    pub labels: Vec<&'a str>,
    #[serde(rename = "type")]
    pub account_type: &'static str,
    pub login: &'a str,
    pub has_password: bool,
    pub valid: bool,
    pub errors: AccountErrors,
}

impl<'a> From<&'a Account> for AccountView<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            id: account.id.as_str(),
            labels: account.labels.iter().map(|l| l.text.as_str()).collect(),
            account_type: account.account_type.as_str(),
            login: &account.login,
            has_password: account.password.as_deref().is_some_and(|p| !p.is_empty()),
            valid: is_valid(account),
            errors: account.errors,
        }
    }
}

/// Logs every store change at debug level.
pub struct TracingObserver;

impl TracingObserver {
    fn describe(event: &StoreEvent) -> &'static str {
        match event {
            StoreEvent::Added(_) => "added",
            StoreEvent::Removed(_) => "removed",
            StoreEvent::Updated { valid: true, .. } => "updated",
            StoreEvent::Updated { valid: false, .. } => "updated (invalid)",
            StoreEvent::Validated { valid: true, .. } => "validated",
            StoreEvent::Validated { valid: false, .. } => "validated (invalid)",
        }
    }
}

impl StoreObserver for TracingObserver {
    fn on_change(&self, event: &StoreEvent, accounts: &[Account]) {
        tracing::debug!(
            "Account {} {}, {} in memory",
            event.account_id(),
            Self::describe(event),
            accounts.len()
        );
    }
}

#[derive(Debug, Serialize)]
struct RemovedView<'a> {
    id: &'a str,
    removed: bool,
}

#[derive(Debug, Serialize)]
struct NotFoundView<'a> {
    error: &'static str,
    id: &'a str,
}

/// Run one command and print its result as pretty JSON.
///
/// # Errors
/// Fails only when the output cannot be serialized or written.
pub fn execute(
    store: &mut AccountStore,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    match command {
        Command::List => {
            let views: Vec<AccountView<'_>> =
                store.accounts().iter().map(AccountView::from).collect();
            print_json(out, &views)?;
            Ok(Outcome::Success)
        }
        Command::Add { fields } => {
            let patch = fields.into_patch();
            let id = store.add();
            if patch.is_empty() {
                tracing::warn!("Account {id} is blank and is not persisted until it is valid");
                print_account(store, &id, out)?;
                return Ok(Outcome::Success);
            }
            store.update(&id, patch);
            print_validated(store, &id, out)
        }
        Command::Update { id, fields } => {
            let id = AccountId::new(id);
            if store.get(&id).is_none() {
                return not_found(&id, out);
            }
            store.update(&id, fields.into_patch());
            print_validated(store, &id, out)
        }
        Command::Remove { id } => {
            let id = AccountId::new(id);
            let removed = store.get(&id).is_some();
            store.remove(&id);
            print_json(
                out,
                &RemovedView {
                    id: id.as_str(),
                    removed,
                },
            )?;
            Ok(Outcome::Success)
        }
        Command::Validate { id } => {
            let id = AccountId::new(id);
            if !store.validate(&id) && store.get(&id).is_none() {
                return not_found(&id, out);
            }
            print_validated(store, &id, out)
        }
        Command::Show { id } => {
            let id = AccountId::new(id);
            if store.get(&id).is_none() {
                return not_found(&id, out);
            }
            print_account(store, &id, out)?;
            Ok(Outcome::Success)
        }
    }
}

/// Print an account whose error flags are current, `Invalid` if any is set.
fn print_validated(
    store: &AccountStore,
    id: &AccountId,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let Some(account) = store.get(id) else {
        return not_found(id, out);
    };
    print_json(out, &AccountView::from(account))?;
    if account.errors.is_empty() {
        Ok(Outcome::Success)
    } else {
        tracing::info!(
            "Account {id} is invalid and was not persisted (labels: {})",
            AccountLabel::join_list(&account.labels)
        );
        Ok(Outcome::Invalid)
    }
}

fn print_account(store: &AccountStore, id: &AccountId, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(account) = store.get(id) {
        print_json(out, &AccountView::from(account))?;
    }
    Ok(())
}

fn not_found(id: &AccountId, out: &mut impl Write) -> anyhow::Result<Outcome> {
    tracing::error!("No account with id {id}");
    print_json(
        out,
        &NotFoundView {
            error: "account not found",
            id: id.as_str(),
        },
    )?;
    Ok(Outcome::NotFound)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
