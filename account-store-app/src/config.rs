//! Application configuration loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use account_store_core::error::{StoreError, StoreResult};
use account_store_core::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "account-store";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key the account collection is persisted under
    pub storage_key: String,
    /// JSON store file; `None` means the platform data directory
    pub data_file: Option<PathBuf>,
    /// Log filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_file: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config_dir>/account-store/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is tried and a missing file yields [`AppConfig::default`].
    ///
    /// # Errors
    /// Returns `StoreError::Config` if an explicit file is missing, a file
    /// cannot be read, or its content is not valid TOML for this structure.
    pub fn load(path: Option<&Path>) -> StoreResult<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a config file that must exist.
    ///
    /// # Errors
    /// Returns `StoreError::Config` on read or parse failure.
    pub fn load_file(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&content)?;
        log::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Parse config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the text is not valid.
    pub fn from_toml(content: &str) -> StoreResult<Self> {
        toml::from_str(content).map_err(|e| StoreError::Config(format!("Invalid config: {e}")))
    }

    /// The store file to use: the configured one, else
    /// `<data_local_dir>/account-store/store.json`, else `store.json` in the
    /// working directory.
    #[must_use]
    pub fn resolved_data_file(&self) -> PathBuf {
        if let Some(ref path) = self.data_file {
            return path.clone();
        }
        dirs::data_local_dir().map_or_else(
            || PathBuf::from(DATA_FILE_NAME),
            |dir| dir.join(APP_DIR_NAME).join(DATA_FILE_NAME),
        )
    }
}
