//! Configuration for the sync tool.
//!
//! Loaded from an optional TOML file; command-line flags are applied on top
//! by the binary. Every field has a default, so an empty file is valid.

use crate::errors::{Result, SyncError};
use bloomin8_client::{BleConfig, DeviceConfig, DeviceSession};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub ble: BleConfig,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSection {
    /// Gallery on the device to synchronize into
    #[serde(default = "default_gallery")]
    pub gallery: String,

    /// Attempt a Bluetooth wake-up when the frame does not answer
    #[serde(default = "default_wake")]
    pub wake: bool,

    /// Delete device images that are not in the source folder
    #[serde(default)]
    pub mirror: bool,

    /// Skip the confirmation prompt
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_gallery() -> String {
    "bloomin8-sync".to_string()
}

fn default_wake() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            gallery: default_gallery(),
            wake: default_wake(),
            mirror: false,
            force: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn session(&self) -> Result<DeviceSession> {
        DeviceSession::from_config(&self.device, &self.ble).map_err(|e| SyncError::Config(e.to_string()))
    }
}
