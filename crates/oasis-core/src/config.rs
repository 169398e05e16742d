use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use oasis_api::MediaSort;
use serde::{Deserialize, Serialize};

use crate::error::OasisError;
use crate::theme::ThemePreference;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub browse: BrowseConfig,
    pub appearance: AppearanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub api_url: String,
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    pub debounce_ms: u64,
    pub default_sort: MediaSort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppearanceConfig {
    pub theme: ThemePreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub file: bool,
}

impl BrowseConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Load the user config file if present, else the built-in defaults.
    pub fn load() -> Result<Self, OasisError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)?;
            Self::from_toml(&user_str)
        } else {
            Self::from_toml(DEFAULT_CONFIG)
        }
    }

    /// Parse and validate a config document.
    pub fn from_toml(s: &str) -> Result<Self, OasisError> {
        let config: AppConfig = toml::from_str(s).map_err(|e| OasisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values `from_toml` cannot express as types.
    pub fn validate(&self) -> Result<(), OasisError> {
        let url = url::Url::parse(&self.catalog.api_url)
            .map_err(|e| OasisError::Config(format!("catalog.api_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OasisError::Config(format!(
                "catalog.api_url: unsupported scheme {}",
                url.scheme()
            )));
        }
        if !(1..=50).contains(&self.catalog.per_page) {
            return Err(OasisError::Config(
                "catalog.per_page must be between 1 and 50".into(),
            ));
        }
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file.
    pub fn db_path() -> PathBuf {
        Self::data_dir().join("oasis.db")
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, OasisError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "oasis")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
