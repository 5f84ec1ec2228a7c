//! 账户相关类型定义

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::{lenient_id, nullable};

/// Separator used when labels are edited as a single line of text.
pub const LABEL_SEPARATOR: char = ';';

/// Opaque account identifier.
///
/// Freshly created accounts get a UUID v4 string; ids read back from storage
/// are taken as-is, whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_id::deserialize(deserializer).map(Self)
    }
}

impl AccountId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 账户类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Password held locally, mandatory
    #[default]
    Local,
    /// Authentication delegated to a directory, no password requirement
    Ldap,
}

impl AccountType {
    /// Whether accounts of this type must carry a password.
    #[must_use]
    pub const fn requires_password(self) -> bool {
        matches!(self, Self::Local)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Ldap => "LDAP",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-form display label. Order matters, duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLabel {
    pub text: String,
}

impl AccountLabel {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Split `"work; vpn"` into labels. Segments are trimmed, empty ones dropped.
    #[must_use]
    pub fn parse_list(text: &str) -> Vec<Self> {
        text.split(LABEL_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::new)
            .collect()
    }

    /// Inverse of [`AccountLabel::parse_list`] for labels without separators.
    #[must_use]
    pub fn join_list(labels: &[Self]) -> String {
        labels
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Per-field error flags shown next to the form inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountErrors {
    pub login: bool,
    pub password: bool,
}

impl AccountErrors {
    /// No flag set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.login && !self.password
    }
}

/// 账户信息
///
/// The serialized shape is `{id, labels, type, login, password}`. `errors`
/// is skipped in both directions: it is never written, and every
/// deserialized account starts with both flags cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// 账户 ID
    pub id: AccountId,
    /// 标签
    #[serde(default)]
    pub labels: Vec<AccountLabel>,
    /// 账户类型
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// 登录名
    pub login: String,
    /// 密码（LDAP 账户可为空）
    #[serde(default)]
    pub password: Option<String>,
    /// UI error flags, recomputed by `AccountStore::validate`
    #[serde(skip)]
    pub errors: AccountErrors,
}

impl Account {
    /// A blank `LOCAL` account as produced by `AccountStore::add`.
    #[must_use]
    pub fn blank(id: AccountId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            account_type: AccountType::Local,
            login: String::new(),
            password: Some(String::new()),
            errors: AccountErrors::default(),
        }
    }

    /// Shallow-merge a patch. Fields the patch leaves as `None` are kept.
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(labels) = patch.labels {
            self.labels = labels;
        }
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
        }
        if let Some(login) = patch.login {
            self.login = login;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
    }
}

/// 更新账户请求
///
/// Every field is optional. For `password`, the outer `Option` says whether
/// the field is touched at all and the inner one carries an explicit null:
/// `{"password": null}` clears it, an absent key leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<AccountLabel>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    #[allow(clippy::option_option)]
    pub password: Option<Option<String>>,
}

impl AccountPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn labels(mut self, labels: Vec<AccountLabel>) -> Self {
        self.labels = Some(labels);
        self
    }

    #[must_use]
    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Some(password.into()));
        self
    }

    /// Set the password to null.
    #[must_use]
    pub fn clear_password(mut self) -> Self {
        self.password = Some(None);
        self
    }

    /// True when applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_none()
            && self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
    }
}
