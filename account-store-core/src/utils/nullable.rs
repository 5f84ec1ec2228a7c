//! `Option<Option<T>>` deserialization helper.
//!
//! Serde maps both an absent key and an explicit `null` to `None` for a plain
//! `Option<T>`. Patches need to tell them apart:
//! - absent key -> `None` (via `#[serde(default)]`)
//! - `null` -> `Some(None)`
//! - value -> `Some(Some(value))`

use serde::{Deserialize, Deserializer};

/// Deserializes a present field, wrapping whatever it holds (including `null`) in `Some`.
#[allow(clippy::option_option)]
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
