//! Fiducial landmarks (`*_MEG_anatomy_fiducials.txt` style files)
//!
//! One statement per line: three coordinates in millimeters per landmark,
//! plus a `coordsys` statement naming the frame.
//!
//! ```text
//! fiducial.nas = [ 91 2 -24 ];
//! fiducial.lpa = [ -3 72 -51 ];
//! fiducial.rpa = [ 5 -69 -52 ];
//! fiducial.coordsys = 'bti';
//! ```

use std::collections::BTreeMap;

use glam::DVec3;
use log::debug;
use serde::Serialize;

use crate::error::HcpError;
use crate::text::{parse_numbers, Tokenizer, TokenizerConfig};
use crate::transforms::MM_PER_M;

/// Key carrying the coordinate-frame tag
pub const COORDSYS_KEY: &str = "coordsys";

/// Named landmark positions in meters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Landmarks {
    /// Landmark name → position in meters
    pub points: BTreeMap<String, DVec3>,
    /// Coordinate frame tag, if the file declares one
    pub coord_frame: Option<String>,
}

impl Landmarks {
    /// Position of a landmark
    pub fn get(&self, name: &str) -> Option<DVec3> {
        self.points.get(name).copied()
    }
}

/// Parse a landmark file. Any malformed line fails the whole file.
pub fn parse_landmarks(text: &str) -> Result<Landmarks, HcpError> {
    let mut landmarks = Landmarks::default();

    for statement in Tokenizer::new(text, TokenizerConfig::single_line()) {
        let statement = statement?;

        if statement.key == COORDSYS_KEY {
            let frame = statement
                .value
                .split(';')
                .next()
                .unwrap_or_default()
                .replace('\'', "");
            landmarks.coord_frame = Some(frame.trim().to_string());
            continue;
        }

        let values = parse_numbers(&statement.key, &statement.value)?;
        let [x, y, z]: [f64; 3] = values.as_slice().try_into().map_err(|_| {
            HcpError::invalid_value(
                &statement.key,
                format!("expected 3 coordinates, found {}", values.len()),
            )
        })?;
        landmarks
            .points
            .insert(statement.key, DVec3::new(x, y, z) / MM_PER_M);
    }

    if landmarks.points.is_empty() {
        return Err(HcpError::EmptyResult { what: "landmarks" });
    }

    debug!(
        "Parsed {} landmarks in frame {:?}",
        landmarks.points.len(),
        landmarks.coord_frame
    );
    Ok(landmarks)
}
