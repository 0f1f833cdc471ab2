use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration. Every field has a default, so a partial (or
/// missing) config file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the recipe API, with trailing slash.
    pub api_base: String,
    /// Fixed wait before every name search. Not a debounce: nothing is
    /// cancelled, every submit waits the same amount.
    pub search_delay_ms: u64,
    /// How long info/error messages stay in the results area.
    pub message_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub popular_categories: Vec<String>,
    pub popular_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            search_delay_ms: 300,
            message_ttl_secs: 5,
            request_timeout_secs: 10,
            popular_categories: ["Chicken", "Beef", "Vegetarian", "Pasta", "Seafood"]
                .into_iter()
                .map(String::from)
                .collect(),
            popular_limit: 6,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the platform config dir when `path` is
    /// `None`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("com", "themealdb", "recipe-finder")
        .ok_or(ConfigError::NoHomeDirectory)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.cache_dir().join("recipe-finder.log"))
}
