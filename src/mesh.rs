//! # Head-model surface mesh
//!
//! FieldTrip head models store the boundary surface as
//! `headmodel.bnd(1).pnt` (N×3 points) and `headmodel.bnd(1).tri` (M×3
//! faces, 1-based as MATLAB indexes). [`extract_mesh`] walks that path in a
//! decoded MAT file, shifts faces to 0-based and optionally maps the points
//! through a [`Transform`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use log::debug;
use serde::Serialize;

use crate::error::HcpError;
use crate::matfile::{MatFile, MatValue, NumericArray};
use crate::transforms::Transform;

/// Top-level variable holding the head model
pub const HEADMODEL_VAR: &str = "headmodel";
/// Boundary field of the head model
pub const BOUNDARY_FIELD: &str = "bnd";
/// Point field names; newer FieldTrip releases renamed `pnt` to `pos`
pub const POINT_FIELDS: [&str; 2] = ["pnt", "pos"];
/// Face field name
pub const FACE_FIELD: &str = "tri";

/// A triangle surface: points and 0-based faces
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    /// Vertex positions
    pub points: Vec<DVec3>,
    /// Triangles as 0-based vertex indices
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Build from an N×3 point array and an M×3 array of 1-based faces
    pub fn from_arrays(points: &NumericArray, faces: &NumericArray) -> Result<Self, HcpError> {
        let points = read_points(points)?;
        let faces = read_faces(faces, points.len())?;
        Ok(Self { points, faces })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Map every point through `transform`
    pub fn transform(&mut self, transform: &Transform) {
        for point in &mut self.points {
            *point = transform.apply(*point);
        }
    }

    /// Multiply every point by `factor` (unit conversion)
    pub fn scale(&mut self, factor: f64) {
        for point in &mut self.points {
            *point *= factor;
        }
    }

    /// Write as an ASCII OFF file
    pub fn write_off<W: Write>(&self, writer: &mut W) -> Result<(), HcpError> {
        writeln!(writer, "OFF")?;
        writeln!(writer, "{} {} 0", self.points.len(), self.faces.len())?;
        for p in &self.points {
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }
        for [a, b, c] in &self.faces {
            writeln!(writer, "3 {} {} {}", a, b, c)?;
        }
        Ok(())
    }

    /// Write as an ASCII OFF file at `path`
    pub fn write_off_file<P: AsRef<Path>>(&self, path: P) -> Result<(), HcpError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_off(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Extract the head-model surface from a decoded MAT file.
///
/// With a transform, every point `p` becomes `R·p + t`; without one the
/// points are returned as stored.
pub fn extract_mesh(container: &MatFile, transform: Option<&Transform>) -> Result<Mesh, HcpError> {
    let headmodel = container
        .get(HEADMODEL_VAR)
        .ok_or_else(|| HcpError::MissingField(HEADMODEL_VAR.to_string()))?;
    let boundary = headmodel
        .field(0, BOUNDARY_FIELD)
        .ok_or_else(|| HcpError::MissingField(format!("{}.{}", HEADMODEL_VAR, BOUNDARY_FIELD)))?;

    let points = POINT_FIELDS
        .iter()
        .find_map(|name| boundary.field(0, name))
        .and_then(MatValue::as_numeric)
        .ok_or_else(|| HcpError::MissingField(format!("{}.{}.pnt", HEADMODEL_VAR, BOUNDARY_FIELD)))?;
    let faces = boundary
        .field(0, FACE_FIELD)
        .and_then(MatValue::as_numeric)
        .ok_or_else(|| {
            HcpError::MissingField(format!("{}.{}.{}", HEADMODEL_VAR, BOUNDARY_FIELD, FACE_FIELD))
        })?;

    let mut mesh = Mesh::from_arrays(points, faces)?;
    if let Some(transform) = transform {
        mesh.transform(transform);
    }

    debug!(
        "Extracted mesh with {} points and {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

fn read_points(points: &NumericArray) -> Result<Vec<DVec3>, HcpError> {
    if points.cols() != 3 {
        return Err(HcpError::invalid_value(
            "pnt",
            format!("expected N x 3 points, found {:?}", points.dims),
        ));
    }
    (0..points.rows())
        .map(|row| {
            let xyz = points
                .row(row)
                .ok_or_else(|| HcpError::invalid_value("pnt", format!("row {} missing", row)))?;
            Ok(DVec3::new(xyz[0], xyz[1], xyz[2]))
        })
        .collect()
}

fn read_faces(faces: &NumericArray, n_points: usize) -> Result<Vec<[u32; 3]>, HcpError> {
    if faces.cols() != 3 && !faces.is_empty() {
        return Err(HcpError::invalid_value(
            "tri",
            format!("expected M x 3 faces, found {:?}", faces.dims),
        ));
    }

    let to_zero_based = |value: f64| -> Result<u32, HcpError> {
        if value.fract() != 0.0 {
            return Err(HcpError::invalid_value(
                "tri",
                format!("face index {} is not an integer", value),
            ));
        }
        let index = value as i64;
        if index < 1 || index as usize > n_points {
            return Err(HcpError::IndexOutOfRange {
                context: "mesh face",
                index,
                bound: n_points + 1,
            });
        }
        Ok((index - 1) as u32)
    };

    (0..faces.rows())
        .map(|row| {
            let abc = faces
                .row(row)
                .ok_or_else(|| HcpError::invalid_value("tri", format!("row {} missing", row)))?;
            Ok([
                to_zero_based(abc[0])?,
                to_zero_based(abc[1])?,
                to_zero_based(abc[2])?,
            ])
        })
        .collect()
}
