//! Account validation.
//!
//! The rules here decide both which accounts may be persisted and which
//! error flags the form shows. Both paths go through [`compute_errors`].

use crate::types::{Account, AccountErrors};

/// Maximum length of `login` and `password`, in UTF-16 code units.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count twice.
pub const MAX_FIELD_LENGTH: usize = 100;

/// Compute the per-field error flags of an account.
///
/// - `login`: empty or longer than [`MAX_FIELD_LENGTH`]
/// - `password`: only for types that require one; missing, empty or too long
#[must_use]
pub fn compute_errors(account: &Account) -> AccountErrors {
    AccountErrors {
        login: !is_valid_field(&account.login),
        password: account.account_type.requires_password()
            && !account.password.as_deref().is_some_and(is_valid_field),
    }
}

/// Whether an account may be written to persistent storage.
#[must_use]
pub fn is_valid(account: &Account) -> bool {
    compute_errors(account).is_empty()
}

fn is_valid_field(value: &str) -> bool {
    !value.is_empty() && value.encode_utf16().count() <= MAX_FIELD_LENGTH
}
