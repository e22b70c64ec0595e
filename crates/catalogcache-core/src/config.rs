//! Application configuration management.
//!
//! Holds the backend base URL, the directory collections are persisted to,
//! and the local catalog's write delay.
//!
//! Configuration is stored at `~/.config/catalogcache/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "catalogcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// Overrides the default storage directory under the user cache dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    pub persist_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir: None,
            persist_debounce_ms: 400,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Config file is not valid JSON")
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_json(r#"{ "api_base_url": "https://shop.example.com/api" }"#).unwrap();
        assert_eq!(config.api_base_url, "https://shop.example.com/api");
        assert_eq!(config.persist_debounce(), Duration::from_millis(400));
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("catalogcache-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join(APP_NAME).join(CONFIG_FILE);

        // Nothing saved yet
        assert_eq!(Config::load_from(&path).unwrap().api_base_url, DEFAULT_API_BASE_URL);

        let config = Config {
            api_base_url: "https://shop.example.com/api".to_string(),
            storage_dir: Some(dir.join("data")),
            persist_debounce_ms: 250,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, "https://shop.example.com/api");
        assert_eq!(loaded.storage_dir, Some(dir.join("data")));
        assert_eq!(loaded.persist_debounce(), Duration::from_millis(250));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_explicit_storage_dir_wins() {
        let config = Config {
            storage_dir: Some(PathBuf::from("/tmp/catalog")),
            ..Default::default()
        };
        assert_eq!(config.storage_dir().unwrap(), PathBuf::from("/tmp/catalog"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::from_json("not json").is_err());
    }
}
