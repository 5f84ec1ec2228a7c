//! Command-line arguments

use std::path::PathBuf;

use account_store_core::types::{AccountLabel, AccountPatch, AccountType};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "account-store")]
#[command(about = "Manage login accounts kept in a local JSON store", long_about = None)]
pub struct Cli {
    /// Config file (default: <config_dir>/account-store/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file, overrides `data_file` from the config
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all accounts
    List,
    /// Add a blank LOCAL account, optionally filling it in right away
    Add {
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Change fields of an account and validate it
    Update {
        id: String,
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Remove an account
    Remove { id: String },
    /// Validate an account and show its error flags
    Validate { id: String },
    /// Show a single account
    Show { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Local,
    Ldap,
}

impl From<TypeArg> for AccountType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Local => AccountType::Local,
            TypeArg::Ldap => AccountType::Ldap,
        }
    }
}

/// Editable account fields. Omitted flags leave the field unchanged.
#[derive(Debug, Default, Args)]
pub struct AccountFields {
    #[arg(long)]
    pub login: Option<String>,

    #[arg(long, conflicts_with = "clear_password")]
    pub password: Option<String>,

    /// Remove the password (for LDAP accounts)
    #[arg(long)]
    pub clear_password: bool,

    #[arg(long = "type", value_enum)]
    pub account_type: Option<TypeArg>,

    /// Labels separated by `;`, e.g. "work; vpn"
    #[arg(long)]
    pub labels: Option<String>,
}

impl AccountFields {
    #[must_use]
    pub fn into_patch(self) -> AccountPatch {
        let mut patch = AccountPatch::new();
        if let Some(labels) = self.labels {
            patch = patch.labels(AccountLabel::parse_list(&labels));
        }
        if let Some(account_type) = self.account_type {
            patch = patch.account_type(account_type.into());
        }
        if let Some(login) = self.login {
            patch = patch.login(login);
        }
        if self.clear_password {
            patch = patch.clear_password();
        } else if let Some(password) = self.password {
            patch = patch.password(password);
        }
        patch
    }
}
