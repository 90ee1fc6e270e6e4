use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::query::EngineConfig;

const APP_NAME: &str = "glossary-search";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum number of cached queries
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Fuzzy match threshold used when a search does not set one
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Terms JSON file or directory of JSON files
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Tag wrapped around highlighted substrings
    #[serde(default = "default_highlight_tag")]
    pub highlight_tag: String,
}

fn default_cache_capacity() -> usize {
    100
}

fn default_threshold() -> f32 {
    0.3
}

fn default_highlight_tag() -> String {
    "mark".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            default_threshold: default_threshold(),
            data_path: None,
            highlight_tag: default_highlight_tag(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config file")
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            ..CacheConfig::default()
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            default_threshold: self.default_threshold,
            highlight_tag: self.highlight_tag.clone(),
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.default_threshold, 0.3);
        assert_eq!(config.highlight_tag, "mark");
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = AppConfig::from_json(r#"{"cache_capacity": 8}"#).unwrap();
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.default_threshold, 0.3);
        assert_eq!(config.cache_config().capacity, 8);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(AppConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_engine_config_carries_tag() {
        let config = AppConfig {
            highlight_tag: "em".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.engine_config().highlight_tag, "em");
    }
}
