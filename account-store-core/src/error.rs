//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
///
/// None of these ever escape an `AccountStore` operation: the store turns
/// backend failures into log lines. They surface from backends, config
/// loading and application bootstrap.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum StoreError {
    /// Storage layer error (backend unreachable, I/O failure, poisoned lock)
    #[error("Storage error: {0}")]
    Storage(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether it is expected behavior (user input, corrupted data, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Serialization(_) | Self::Config(_) => true,
            Self::Storage(_) => false,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Core layer Result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;
