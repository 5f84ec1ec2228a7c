//! Identifier deserialization helper.
//!
//! Ids written by older clients were millisecond timestamps and may come
//! back from storage as JSON numbers rather than strings:
//! - String: taken as-is
//! - Integer: rendered in decimal

use serde::{Deserialize, Deserializer};

/// Deserializes an identifier from a JSON string or integer.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        I64(i64),
        U64(u64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::I64(n) => n.to_string(),
        StringOrNumber::U64(n) => n.to_string(),
    })
}
