//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the remote collection URL, paging, the local snapshot and the
//! defaults applied to listed records.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::repository::{ListDefaults, DEFAULT_LIMIT};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const SNAPSHOT_FILE_NAME: &str = "tasks.json";
const DEFAULT_DIRECTORY_PATH: &str = ".config/taskboard";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub page_size: u32,
    pub snapshot: bool,
    pub snapshot_path: Option<PathBuf>,
    pub log_level: String,
    pub list_defaults: ListDefaults,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_snapshot")]
    pub snapshot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub list_defaults: ListDefaults,
}

fn default_page_size() -> u32 {
    DEFAULT_LIMIT
}

fn default_snapshot() -> bool {
    true
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
    /// Return a new instance with default values and no file.
    ///
    pub fn new() -> Config {
        Config {
            api_base_url: None,
            page_size: default_page_size(),
            snapshot: default_snapshot(),
            snapshot_path: None,
            log_level: default_log_level(),
            list_defaults: ListDefaults::default(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            if data.page_size == 0 {
                return Err(ConfigError::InvalidPageSize.into());
            }
            self.api_base_url = data.api_base_url;
            self.page_size = data.page_size;
            self.snapshot = data.snapshot;
            self.snapshot_path = data.snapshot_path;
            self.log_level = data.log_level;
            self.list_defaults = data.list_defaults;
        }

        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            api_base_url: self.api_base_url.clone(),
            page_size: self.page_size,
            snapshot: self.snapshot,
            snapshot_path: self.snapshot_path.clone(),
            log_level: self.log_level.clone(),
            list_defaults: self.list_defaults.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
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
        })?;
        Ok(())
    }

    /// Returns the configured collection URL.
    ///
    pub fn api_base_url(&self) -> Result<&str, ConfigError> {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::ApiBaseUrlNotSet)
    }

    /// Returns where the task snapshot lives, or `None` when disabled.
    ///
    pub fn snapshot_file(&self) -> Option<PathBuf> {
        if !self.snapshot {
            return None;
        }
        if let Some(path) = &self.snapshot_path {
            return Some(path.clone());
        }
        self.file_path
            .as_ref()
            .and_then(|file| file.parent())
            .map(|dir| dir.join(SNAPSHOT_FILE_NAME))
    }

    /// Returns where the configuration is saved, once loaded.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
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
    use crate::repository::{TaskPriority, TaskStatus};

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();

        assert_eq!(config.page_size, 10);
        assert!(config.snapshot);
        assert_eq!(config.list_defaults, ListDefaults::default());
        assert!(matches!(config.api_base_url(), Err(ConfigError::ApiBaseUrlNotSet)));
        assert_eq!(config.snapshot_file(), Some(dir.path().join("tasks.json")));
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yml"),
            "api_base_url: http://localhost:3000/tasks\n\
             page_size: 25\n\
             snapshot: false\n\
             log_level: debug\n\
             list_defaults:\n  status: In Progress\n  priority: High\n",
        )
        .unwrap();

        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();

        assert_eq!(config.api_base_url().unwrap(), "http://localhost:3000/tasks");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.snapshot_file(), None);
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.list_defaults.status, TaskStatus::InProgress);
        assert_eq!(config.list_defaults.priority, TaskPriority::High);
        assert!(config.list_defaults.description_from_title);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        config.api_base_url = Some("https://example.com/todos".to_string());
        config.snapshot_path = Some(dir.path().join("cache.json"));
        config.save().unwrap();
        assert_eq!(config.file_path(), Some(dir.path().join("config.yml").as_path()));

        let mut reloaded = Config::new();
        reloaded.load(dir.path().to_str()).unwrap();
        assert_eq!(reloaded.api_base_url, config.api_base_url);
        assert_eq!(reloaded.snapshot_file(), Some(dir.path().join("cache.json")));
    }

    #[test]
    fn rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), "page_size: 0\n").unwrap();
        let result = Config::new().load(dir.path().to_str());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidPageSize))
        ));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::new()
        };
        assert!(matches!(
            config.log_level_filter(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn save_without_file_path() {
        assert!(matches!(
            Config::new().save(),
            Err(AppError::Config(ConfigError::FilePathNotSet))
        ));
    }
}
