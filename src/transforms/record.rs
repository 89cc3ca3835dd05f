use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Transform;
use crate::error::HcpError;

/// Anatomical coordinate frames used by the HCP MEG data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordFrame {
    /// MEG device (sensor array) frame
    Device,
    /// Head frame defined by the fiducials (BTi/4D convention)
    Head,
    /// Structural MRI surface (tkr) frame
    Mri,
    /// Scanner RAS frame of the structural image
    Ras,
    /// SPM normalized frame
    Spm,
}

impl fmt::Display for CoordFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoordFrame::Device => "device",
            CoordFrame::Head => "head",
            CoordFrame::Mri => "mri",
            CoordFrame::Ras => "ras",
            CoordFrame::Spm => "spm",
        };
        f.write_str(name)
    }
}

/// A transform tagged with its source and destination frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Frame of the input coordinates
    pub from: CoordFrame,
    /// Frame of the output coordinates
    pub to: CoordFrame,
    /// The transform itself
    pub trans: Transform,
}

impl TransformRecord {
    /// Create a new record
    pub fn new(from: CoordFrame, to: CoordFrame, trans: Transform) -> Self {
        Self { from, to, trans }
    }

    /// The record for the opposite direction
    pub fn inverted(&self) -> Result<Self, HcpError> {
        Ok(Self {
            from: self.to,
            to: self.from,
            trans: self.trans.inverse()?,
        })
    }

    /// Write as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), HcpError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a record written by [`TransformRecord::write_json`]
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, HcpError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
