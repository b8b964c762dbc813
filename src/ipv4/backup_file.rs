use crate::ipv4::types::ConfigRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid backup file: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, BackupFileError>;

/// Contents of a backup file: descriptive interface properties plus the
/// registry record they were taken with.
#[derive(Clone, PartialEq, Debug)]
pub struct BackupFile {
    pub interface_info: Map<String, Value>,
    pub record: ConfigRecord,
}

#[derive(Serialize)]
struct FileContentRef<'a> {
    #[serde(rename = "NetworkInterfaceInfo")]
    interface_info: &'a Map<String, Value>,
    #[serde(rename = "Ipv4RegistryEntries")]
    record: Value,
}

#[derive(Deserialize)]
struct FileContent {
    #[serde(rename = "NetworkInterfaceInfo", default)]
    interface_info: Option<Map<String, Value>>,
    #[serde(rename = "Ipv4RegistryEntries", default)]
    record: Option<Value>,
}

impl BackupFile {
    pub fn new(interface_info: Map<String, Value>, record: ConfigRecord) -> Self {
        Self {
            interface_info,
            record,
        }
    }

    /// Writes the file as indented JSON, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let record = self
            .record
            .to_document()
            .map_err(|e| BackupFileError::Format(e.to_string()))?;
        let content = FileContentRef {
            interface_info: &self.interface_info,
            record,
        };
        let json = serde_json::to_string_pretty(&content)
            .map_err(|e| BackupFileError::Format(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let content: Option<FileContent> =
            serde_json::from_str(data).map_err(|e| BackupFileError::Format(e.to_string()))?;
        let content =
            content.ok_or_else(|| BackupFileError::Format("document is null".to_string()))?;

        let interface_info = content
            .interface_info
            .ok_or_else(|| BackupFileError::Format("NetworkInterfaceInfo is missing".to_string()))?;
        let record = content
            .record
            .ok_or_else(|| BackupFileError::Format("Ipv4RegistryEntries is missing".to_string()))?;
        let record = ConfigRecord::from_document(record)
            .map_err(|e| BackupFileError::Format(format!("Ipv4RegistryEntries: {}", e)))?;

        Ok(Self {
            interface_info,
            record,
        })
    }
}
