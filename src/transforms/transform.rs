use std::ops::Mul;

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::HcpError;

/// Millimeters per meter; HCP text dumps store translations in millimeters
pub const MM_PER_M: f64 = 1000.0;

/// Determinants below this magnitude are treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

/// A 4×4 homogeneous affine transform between two coordinate frames.
///
/// Applied to column vectors: `p' = R·p + t`. Serialized row-major as
/// `[[f64; 4]; 4]`, matching the text dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 4]; 4]", into = "[[f64; 4]; 4]")]
pub struct Transform(DMat4);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform
    pub const IDENTITY: Self = Self(DMat4::IDENTITY);

    /// Build from four rows
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(DMat4::from_cols_array_2d(&rows).transpose())
    }

    /// Build from 16 values in row-major order
    pub fn from_row_major(values: &[f64]) -> Option<Self> {
        let values: &[f64; 16] = values.try_into().ok()?;
        Some(Self(DMat4::from_cols_array(values).transpose()))
    }

    /// Wrap a glam matrix
    pub fn from_matrix(matrix: DMat4) -> Self {
        Self(matrix)
    }

    /// Pure translation
    pub fn from_translation(translation: DVec3) -> Self {
        Self(DMat4::from_translation(translation))
    }

    /// The underlying glam matrix (column-major)
    pub fn matrix(&self) -> &DMat4 {
        &self.0
    }

    /// The matrix as four rows
    pub fn rows(&self) -> [[f64; 4]; 4] {
        self.0.transpose().to_cols_array_2d()
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0.col(col)[row]
    }

    /// Translation column (rows 0–2 of column 3)
    pub fn translation(&self) -> DVec3 {
        self.0.w_axis.truncate()
    }

    /// Copy with the translation column divided by `divisor`.
    ///
    /// Rotation and scale entries are left untouched; they are unit-free.
    pub fn with_translation_divided(self, divisor: f64) -> Self {
        let mut matrix = self.0;
        matrix.w_axis.x /= divisor;
        matrix.w_axis.y /= divisor;
        matrix.w_axis.z /= divisor;
        Self(matrix)
    }

    /// Copy with a millimeter translation converted to meters
    pub fn to_meters(self) -> Self {
        self.with_translation_divided(MM_PER_M)
    }

    /// Matrix inverse
    pub fn inverse(&self) -> Result<Self, HcpError> {
        let det = self.0.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(HcpError::SingularTransform(det));
        }
        Ok(Self(self.0.inverse()))
    }

    /// `self` followed by `next`: the product `next · self`
    pub fn then(&self, next: &Transform) -> Self {
        Self(next.0 * self.0)
    }

    /// Apply to a point as a homogeneous coordinate
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.0.transform_point3(point)
    }

    /// Approximate equality, entry by entry
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

impl From<[[f64; 4]; 4]> for Transform {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Transform> for [[f64; 4]; 4] {
    fn from(transform: Transform) -> Self {
        transform.rows()
    }
}
