use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub const DEFAULT_BACKUP_FILE: &str = "ethernet.json";
pub const DEFAULT_ERROR_LOG_FILE: &str = "winipv4backup-error.log";

#[derive(Clone, PartialEq, Serialize, Deserialize, Default, Debug)]
#[serde(default)]
pub struct AppConfig {
    /// Backup file; relative paths resolve against the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log_file: Option<PathBuf>,
    /// Replaces the built-in description exclusion pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_interface: Option<String>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backup_path(&self) -> PathBuf {
        self.backup_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_FILE))
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.error_log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG_FILE))
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(dirs::data_local_dir)
        .ok_or(ConfigError::ConfigDirNotFound)?;

    let app_config_dir = config_dir.join("winipv4backup");
    Ok(app_config_dir.join("config.jsonc"))
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_path = get_config_path()?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(config_path)
}

/// Reads `config.jsonc`. A missing file yields defaults: the backup goes to
/// `ethernet.json` and failures to `winipv4backup-error.log`, both in the
/// working directory, and interfaces use the built-in exclusion pattern.
pub fn load_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    let stripped = json_comments::StripComments::new(content.as_bytes());
    Ok(serde_json::from_reader(stripped)?)
}

/// Saves the configuration to the config file.
/// Note: Comments in the original file will not be preserved.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let config_path = ensure_config_dir()?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, json)?;
    Ok(())
}
