use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::overlay::DEFAULT_UPCOMING_LIMIT;

pub const APP_ID: &str = "crmdesk";
pub const API_BASE_URL_ENV: &str = "CRMDESK_API_BASE_URL";

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_ID)
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct CrmConfig {
    pub api_base_url: String,
    pub data_directory: PathBuf,
    /// Cap on the month/year "what's next" list; 0 shows everything.
    pub upcoming_limit: usize,
    pub debug_logging: bool,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_directory: default_data_dir(),
            upcoming_limit: default_upcoming_limit(),
            debug_logging: false,
        }
    }
}

impl CrmConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_ID)
            .join("config.json")
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable. The environment override is applied afterwards.
    pub fn load(path: &Path) -> Self {
        let mut config = match Self::read(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        };
        config.apply_env(std::env::var(API_BASE_URL_ENV).ok());
        config
    }

    /// `Ok(None)` when there is no config file yet.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn apply_env(&mut self, api_base_url: Option<String>) {
        if let Some(url) = api_base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api_base_url = url;
        }
    }

    pub fn workspace_overrides_path(&self) -> PathBuf {
        self.data_directory.join("workspace_overrides.json")
    }

    pub fn conversations_cache_path(&self) -> PathBuf {
        self.data_directory.join("conversations.json")
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_directory).map_err(|source| ConfigError::Io {
            path: self.data_directory.clone(),
            source,
        })
    }
}
