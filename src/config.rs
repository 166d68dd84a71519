//! Configuration - `reconx.toml` loading
//!
//! Search order when no path is given:
//! `.reconx.toml`, `reconx.toml`, then `<config dir>/reconx/config.toml`.
//! API keys never come from the file; they are read from the environment
//! after loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::AiConfig;
use crate::lifecycle::LifecycleConfig;

/// Errors loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config in {path}: {message}")]
    Invalid { path: String, message: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub lifecycle: LifecycleConfig,
}

impl AppConfig {
    /// Candidate config files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".reconx.toml"), PathBuf::from("reconx.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("reconx").join("config.toml"));
        }
        paths
    }

    /// Load `path` strictly; any problem is an error
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !path.exists() {
            return Err(ConfigLoadError::NotFound { path: path_str });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigLoadError::Read {
            path: path_str.clone(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            path: path_str.clone(),
            source: e,
        })?;

        config
            .ai
            .validate()
            .map_err(|message| ConfigLoadError::Invalid {
                path: path_str.clone(),
                message,
            })?;

        config.ai.load_api_key_from_env();
        debug!("Loaded configuration from {}", path_str);
        Ok(config)
    }

    /// Load the explicit path or the first file found on the search path.
    /// Problems are logged and defaults used instead.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let candidates = match path {
            Some(p) => vec![p.to_path_buf()],
            None => Self::search_paths(),
        };

        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("{}; using defaults", e);
                    break;
                }
            }
        }

        if let Some(p) = path.filter(|p| !p.exists()) {
            warn!("Config file {} not found; using defaults", p.display());
        }

        let mut config = Self::default();
        config.ai.load_api_key_from_env();
        config
    }
}
