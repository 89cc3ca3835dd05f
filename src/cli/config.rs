//! TOML configuration file support.
//!
//! Settings that would otherwise be fixed can be kept in a config file:
//!
//! ```toml
//! # hcpmeg.toml
//! [anatomy]
//! convert_to_meter = true
//! device_to_structural = "bti2spm"
//! headmodel_unit = "mm"
//!
//! [sensors]
//! rotation_x = 0.0
//! translation = [0.0, 0.02, 0.11]
//! ecg_channel = "E31"
//! eog_channels = ["E63", "E64"]
//! ```

use anyhow::{Context, Result};
use hcpmeg::anatomy::AnatomyConfig;
use hcpmeg::io::SensorOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure for hcpmeg.toml files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Anatomy pipeline settings.
    #[serde(default)]
    pub anatomy: AnatomyConfig,

    /// Sensor alignment handed to the sensor-array reader.
    #[serde(default)]
    pub sensors: SensorOptions,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
