use serde::{Deserialize, Serialize};

use crate::transforms::MM_PER_M;

/// Length unit of stored coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeter,
    /// Meters
    #[serde(rename = "m")]
    Meter,
}

impl LengthUnit {
    /// Size of one unit in meters
    pub fn in_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0 / MM_PER_M,
            LengthUnit::Meter => 1.0,
        }
    }
}

/// Settings of the anatomy extraction pipeline.
///
/// Every field has a default matching the HCP MEG anatomy release, so a
/// TOML `[anatomy]` table only needs the keys that differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnatomyConfig {
    /// Rescale transform translations and mesh points from mm to meters
    pub convert_to_meter: bool,
    /// Transform-table entry mapping the device frame to the structural scan
    pub device_to_structural: String,
    /// Suffix of the structural RAS transform file
    pub ras_suffix: String,
    /// Suffix of the MEG anatomy transform dump
    pub transform_suffix: String,
    /// Suffix of the MEG anatomy head model
    pub headmodel_suffix: String,
    /// Unit of the head-model points
    pub headmodel_unit: LengthUnit,
    /// File name of the written surface, under `<subject>/bem/`
    pub surface_name: String,
}

impl Default for AnatomyConfig {
    fn default() -> Self {
        Self {
            convert_to_meter: true,
            device_to_structural: "bti2spm".to_string(),
            ras_suffix: "c_ras.mat".to_string(),
            transform_suffix: "_MEG_anatomy_transform.txt".to_string(),
            headmodel_suffix: "_MEG_anatomy_headmodel.mat".to_string(),
            headmodel_unit: LengthUnit::Millimeter,
            surface_name: "inner_skull.off".to_string(),
        }
    }
}

impl AnatomyConfig {
    /// Unit the composed transform is expressed in
    pub fn target_unit(&self) -> LengthUnit {
        if self.convert_to_meter {
            LengthUnit::Meter
        } else {
            LengthUnit::Millimeter
        }
    }

    /// Factor taking head-model points to the target unit
    pub fn mesh_scale(&self) -> f64 {
        self.headmodel_unit.in_meters() / self.target_unit().in_meters()
    }
}
