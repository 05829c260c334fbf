//! Engine configuration
//!
//! Defaults live in code; a YAML file can override them. The file is
//! looked up from `JELLYLISTS_CONFIG` or the platform config directory,
//! and a missing file silently yields the defaults so the engine works
//! out of the box.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file path
pub const ENV_CONFIG_PATH: &str = "JELLYLISTS_CONFIG";

/// Default page size for playlist item requests
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Page size used when `prefer_large_pages` is set
pub const LARGE_PAGE_SIZE: usize = 500;

/// Delay between committed move calls, to reduce server pressure
pub const DEFAULT_MOVE_THROTTLE_MS: u64 = 30;

/// Ceiling on ids per chunked add/remove call
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server base URL, e.g. `http://jellyfin.local:8096`
    pub server_url: Option<String>,
    /// Opaque access token sent with every request
    pub access_token: Option<String>,
    /// Page size for playlist item requests
    pub page_size: usize,
    /// Use [`LARGE_PAGE_SIZE`] when the configured page size is not
    /// raised above the stock default
    pub prefer_large_pages: bool,
    /// Keep fetching pages until the reported total is reached
    pub auto_load_all: bool,
    /// Milliseconds to sleep after each committed move call
    pub move_throttle_ms: u64,
    /// Ids per chunked add/remove call
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            prefer_large_pages: true,
            auto_load_all: true,
            move_throttle_ms: DEFAULT_MOVE_THROTTLE_MS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// Checks `JELLYLISTS_CONFIG` first, then
    /// `<config dir>/jellylists/config.yaml`. A missing file is not an
    /// error; malformed YAML is.
    pub fn load() -> anyhow::Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::info!("No config file at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from a specific YAML file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {:?}", path))?;
        if config.page_size == 0 {
            return Err(anyhow!("page_size must be positive"));
        }
        if config.batch_size == 0 {
            return Err(anyhow!("batch_size must be positive"));
        }
        Ok(config)
    }

    /// Write the configuration as YAML
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {:?}", parent))?;
        }
        let text = serde_yaml::to_string(self)?;
        std::fs::write(path, text).with_context(|| format!("writing config file {:?}", path))
    }

    /// The config file path implied by the environment
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("jellylists").join("config.yaml"))
    }

    /// Page size after applying the large-pages preference
    pub fn effective_page_size(&self) -> usize {
        if self.prefer_large_pages {
            self.page_size.max(LARGE_PAGE_SIZE)
        } else {
            self.page_size
        }
    }

    /// Move throttle as a [`Duration`]
    pub fn move_throttle(&self) -> Duration {
        Duration::from_millis(self.move_throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.move_throttle(), Duration::from_millis(30));
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.auto_load_all);
    }

    #[test]
    fn test_effective_page_size() {
        let mut config = Config::default();
        assert_eq!(config.effective_page_size(), LARGE_PAGE_SIZE);

        config.prefer_large_pages = false;
        assert_eq!(config.effective_page_size(), DEFAULT_PAGE_SIZE);

        config.prefer_large_pages = true;
        config.page_size = 1000;
        assert_eq!(config.effective_page_size(), 1000);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.server_url = Some("http://jellyfin.local:8096".to_string());
        config.move_throttle_ms = 100;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "page_size: 50\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.page_size, 50);
        assert_eq!(loaded.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "batch_size: 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
