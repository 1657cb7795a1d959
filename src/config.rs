//! Top-level application configuration.
//!
//! Configuration is stored in `<root>/config.yaml` (see [`crate::paths`])
//! and covers the backend location, HTTP timeouts and list page sizes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DashError, Result};
use crate::paths;

/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "IDSDASH_API_URL";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api_url",
    "request_timeout",
    "connect_timeout",
    "items_per_page",
    "startup_page_size",
];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend API, including the `/api` prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Rows per page in the alert and incident tables (default: 10)
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Page size requested for each list during the startup load (default: 50)
    #[serde(default = "default_startup_page_size")]
    pub startup_page_size: usize,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_items_per_page() -> usize {
    10
}

fn default_startup_page_size() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            items_per_page: default_items_per_page(),
            startup_page_size: default_startup_page_size(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        paths::config_path()
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DashError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DashError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            DashError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        parse_api_url(&self.api_url)?;
        if self.items_per_page == 0 {
            return Err(DashError::Config(
                "items_per_page must be at least 1".to_string(),
            ));
        }
        if self.startup_page_size == 0 {
            return Err(DashError::Config(
                "startup_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective backend URL: `IDSDASH_API_URL` if set, else the config value
    pub fn api_url(&self) -> Result<Url> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return parse_api_url(&url);
        }
        parse_api_url(&self.api_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Read a single key as a display string
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api_url.clone()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "connect_timeout" => Ok(self.connect_timeout.to_string()),
            "items_per_page" => Ok(self.items_per_page.to_string()),
            "startup_page_size" => Ok(self.startup_page_size.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Parse and assign a single key. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "api_url" => {
                parse_api_url(value)?;
                updated.api_url = value.to_string();
            }
            "request_timeout" => updated.request_timeout = parse_number(key, value)?,
            "connect_timeout" => updated.connect_timeout = parse_number(key, value)?,
            "items_per_page" => updated.items_per_page = parse_number(key, value)?,
            "startup_page_size" => updated.startup_page_size = parse_number(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn unknown_key(key: &str) -> DashError {
    DashError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DashError::Config(format!("{} expects a non-negative integer, got '{}'", key, value)))
}

/// Parse a backend base URL, requiring an http(s) scheme.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| DashError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(DashError::InvalidUrl(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.connect_timeout, 10);
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.startup_page_size, 50);
    }

    #[test]
    fn test_config_partial_yaml_uses_defaults() {
        let yaml = "api_url: https://ids.example.com/api\nitems_per_page: 25\n";
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.api_url, "https://ids.example.com/api");
        assert_eq!(config.items_per_page, 25);
        assert_eq!(config.request_timeout, 30);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.set("startup_page_size", "100").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.startup_page_size, 100);
    }

    #[test]
    fn test_load_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_url: not a url\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(DashError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_set_rejects_bad_values_without_mutating() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("items_per_page", "zero"),
            Err(DashError::Config(_))
        ));
        assert!(matches!(
            config.set("items_per_page", "0"),
            Err(DashError::Config(_))
        ));
        assert!(matches!(
            config.set("api_url", "ftp://example.com"),
            Err(DashError::InvalidUrl(_))
        ));
        assert!(matches!(
            config.set("colour", "blue"),
            Err(DashError::Config(_))
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("connect_timeout").unwrap(), "10");
        assert!(config.get("nope").is_err());
    }

    #[test]
    #[serial]
    fn test_api_url_env_override() {
        let config = Config::default();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { env::set_var(API_URL_ENV, "https://override.example.com/api") };
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "https://override.example.com/api"
        );
        unsafe { env::remove_var(API_URL_ENV) };
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "http://localhost:5000/api"
        );
    }
}
