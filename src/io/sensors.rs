use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HcpError;
use crate::transforms::Transform;

/// Alignment and naming options handed to the sensor-array reader.
///
/// The defaults are the values the HCP MEG pipelines used with the 4D
/// Neuroimaging / BTi system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorOptions {
    /// Rotation about the x axis, in degrees
    pub rotation_x: f64,
    /// Device origin offset, in meters
    pub translation: [f64; 3],
    /// Channel recorded as ECG
    pub ecg_channel: String,
    /// Channels recorded as EOG
    pub eog_channels: Vec<String>,
    /// Convert to Neuromag coordinates
    pub convert: bool,
    /// Rename channels to Neuromag-style names
    pub rename_channels: bool,
    /// Sort channels by name instead of keeping acquisition order
    pub sort_by_name: bool,
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self {
            rotation_x: 0.0,
            translation: [0.0, 0.02, 0.11],
            ecg_channel: "E31".to_string(),
            eog_channels: vec!["E63".to_string(), "E64".to_string()],
            convert: false,
            rename_channels: false,
            sort_by_name: false,
        }
    }
}

/// Measurement info returned by a sensor-array reader
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelInfo {
    /// Channel names in acquisition order
    pub ch_names: Vec<String>,
    /// Sampling frequency in Hz
    pub sfreq: f64,
    /// Device to head transform, when the config file carries one
    pub dev_head_t: Option<Transform>,
}

/// Port to a vendor sensor-array reader.
///
/// Decoding the BTi `config` file is not part of this crate; callers plug in
/// a reader and [`crate::io::read_info`] hands it the right file.
pub trait SensorArrayReader: Send + Sync {
    /// Read the measurement info from an acquisition `config` file
    fn read_info(&self, config: &Path, options: &SensorOptions) -> Result<ChannelInfo, HcpError>;
}
