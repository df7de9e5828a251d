//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including backend endpoints, the fallback vendor id and the cookie header
//! available to identity resolution.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::identity::CookieJar;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const STORE_DIRECTORY: &str = "store";
const DEFAULT_DIRECTORY_PATH: &str = ".config/vendor-portal";
const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";

pub const ENV_API_URL: &str = "VENDOR_PORTAL_API_URL";
pub const ENV_GRAPHQL_URL: &str = "VENDOR_PORTAL_GRAPHQL_URL";
pub const ENV_VENDOR_ID: &str = "VENDOR_PORTAL_VENDOR_ID";
pub const ENV_COOKIE: &str = "VENDOR_PORTAL_COOKIE";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub graphql_url: Option<String>,
    pub default_vendor_id: Option<String>,
    pub cookie: Option<String>,
    pub log_level: String,
    dir_path: Option<PathBuf>,
}

/// Settings given on the command line to persist. `None` leaves the current
/// value alone; an empty string clears an optional setting.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub api_base_url: Option<String>,
    pub graphql_url: Option<String>,
    pub default_vendor_id: Option<String>,
    pub cookie: Option<String>,
    pub log_level: Option<String>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default values and no file location.
    ///
    pub fn new() -> Config {
        Config {
            api_base_url: default_api_base_url(),
            graphql_url: None,
            default_vendor_id: None,
            cookie: None,
            log_level: default_log_level(),
            dir_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.dir_path = Some(dir_path);

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.api_base_url = data.api_base_url;
            self.graphql_url = data.graphql_url;
            self.default_vendor_id = data.default_vendor_id;
            self.cookie = data.cookie;
            self.log_level = data.log_level;
        }

        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from the given variable lookup. Empty values are ignored.
    ///
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = get(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = get(ENV_GRAPHQL_URL) {
            self.graphql_url = Some(url);
        }
        if let Some(id) = get(ENV_VENDOR_ID) {
            self.default_vendor_id = Some(id);
        }
        if let Some(cookie) = get(ENV_COOKIE) {
            self.cookie = Some(cookie);
        }
    }

    /// Returns the GraphQL endpoint, defaulting to `{api_base_url}/graphql`.
    ///
    pub fn graphql_url(&self) -> String {
        match &self.graphql_url {
            Some(url) => url.clone(),
            None => format!("{}/graphql", self.api_base_url.trim_end_matches('/')),
        }
    }

    pub fn cookies(&self) -> CookieJar {
        self.cookie
            .as_deref()
            .map(CookieJar::parse)
            .unwrap_or_default()
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "log_level",
                message: format!("unknown level '{}'", self.log_level),
            })
    }

    /// Directory for durable session storage, next to the configuration file.
    ///
    pub fn store_dir(&self) -> Option<PathBuf> {
        self.dir_path
            .as_ref()
            .map(|dir| dir.join(STORE_DIRECTORY))
    }

    /// Apply the given settings and write them to the configuration file.
    /// Nothing is written when a value is invalid.
    ///
    pub fn update(&mut self, update: ConfigUpdate) -> Result<(), AppError> {
        let optional = |value: String| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let mut next = self.clone();
        if let Some(url) = update.api_base_url {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    message: "must not be empty".to_string(),
                }
                .into());
            }
            next.api_base_url = url.to_string();
        }
        if let Some(url) = update.graphql_url {
            next.graphql_url = optional(url);
        }
        if let Some(id) = update.default_vendor_id {
            next.default_vendor_id = optional(id);
        }
        if let Some(cookie) = update.cookie {
            next.cookie = optional(cookie);
        }
        if let Some(level) = update.log_level {
            next.log_level = level.trim().to_string();
            next.log_level_filter()?;
        }
        next.save()?;
        *self = next;
        Ok(())
    }

    /// Location of the configuration file, once a directory is known.
    ///
    pub fn file_path(&self) -> Option<PathBuf> {
        self.dir_path.as_ref().map(|dir| dir.join(FILE_NAME))
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let dir_path = self.dir_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            api_base_url: self.api_base_url.clone(),
            graphql_url: self.graphql_url.clone(),
            default_vendor_id: self.default_vendor_id.clone(),
            cookie: self.cookie.clone(),
            log_level: self.log_level.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if !dir_path.exists() {
            fs::create_dir_all(dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(FILE_NAME);
        let mut file = fs::File::create(&file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?; // Ensure data is written to disk
        Ok(())
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(DEFAULT_DIRECTORY_PATH)),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SESSION_COOKIE;
    use fake::uuid::UUIDv4;
    use fake::Fake;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let id: Uuid = UUIDv4.fake();
        std::env::temp_dir().join(format!("vendor-portal-config-{}", id))
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.graphql_url(), "http://localhost:4000/graphql");
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Info);
        assert!(config.store_dir().is_none());
        assert!(config.cookies().is_empty());
    }

    #[test]
    fn test_load_missing_file_keeps_defaults() {
        let dir = temp_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert!(dir.exists());
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.store_dir(), Some(dir.join("store")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_then_load() {
        let dir = temp_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        config.api_base_url = "https://api.example.com/".to_string();
        config.default_vendor_id = Some("V1".to_string());
        config.log_level = "debug".to_string();
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded.api_base_url, "https://api.example.com/");
        assert_eq!(reloaded.graphql_url(), "https://api.example.com/graphql");
        assert_eq!(reloaded.default_vendor_id.as_deref(), Some("V1"));
        assert_eq!(reloaded.log_level_filter().unwrap(), LevelFilter::Debug);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "default_vendor_id: V7\n").unwrap();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert_eq!(config.default_vendor_id.as_deref(), Some("V7"));
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.log_level, "info");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_update_persists_and_clears() {
        let dir = temp_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        config
            .update(ConfigUpdate {
                api_base_url: Some(" https://api.example.com ".to_string()),
                default_vendor_id: Some("V1".to_string()),
                cookie: Some("vendor_access_token=a.b.c".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.file_path(), Some(dir.join(FILE_NAME)));

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded.api_base_url, "https://api.example.com");
        assert_eq!(reloaded.default_vendor_id.as_deref(), Some("V1"));
        assert_eq!(reloaded.cookie.as_deref(), Some("vendor_access_token=a.b.c"));

        reloaded
            .update(ConfigUpdate {
                default_vendor_id: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        let mut cleared = Config::new();
        cleared.load(dir.to_str()).unwrap();
        assert!(cleared.default_vendor_id.is_none());
        assert_eq!(cleared.api_base_url, "https://api.example.com");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_update_rejects_invalid_level() {
        let dir = temp_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        let result = config.update(ConfigUpdate {
            default_vendor_id: Some("V1".to_string()),
            log_level: Some("loud".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(config.default_vendor_id.is_none());
        assert!(!dir.join(FILE_NAME).exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_without_location_fails() {
        assert!(Config::new().save().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://api.example.com"),
            (ENV_VENDOR_ID, "  "),
            (ENV_COOKIE, "vendor_session=a.b.c"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::new();
        config.default_vendor_id = Some("KEEP".to_string());
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.graphql_url(), "https://api.example.com/graphql");
        assert_eq!(config.default_vendor_id.as_deref(), Some("KEEP"));
        assert_eq!(config.cookies().get(SESSION_COOKIE), Some("a.b.c"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::new();
        config.log_level = "loud".to_string();
        assert!(config.log_level_filter().is_err());
    }
}
