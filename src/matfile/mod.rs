//! # MAT v5 container reader
//!
//! HCP ships head models, ICA classifications and trial definitions as
//! MATLAB level-5 MAT files. This module decodes them into a tree of
//! [`MatValue`]s so callers can walk fixed field paths such as
//! `headmodel.bnd(1).pnt`.
//!
//! ## Supported
//!
//! - Little- and big-endian files
//! - `miCOMPRESSED` (zlib) variables, as written by `save -v7`
//! - Numeric classes (widened to `f64`), logical, char, cell and struct arrays
//!
//! ## Not supported
//!
//! - v7.3 files (HDF5 containers)
//! - Sparse, object and function-handle classes
//!
//! ## Example
//!
//! ```rust,no_run
//! use hcpmeg::matfile::MatFile;
//!
//! let mat = MatFile::open("100307_MEG_anatomy_headmodel.mat")?;
//! for (name, value) in mat.iter() {
//!     println!("{}: {}", name, value.describe());
//! }
//! # Ok::<(), hcpmeg::matfile::MatError>(())
//! ```

mod error;
mod reader;
mod value;

#[cfg(test)]
mod tests;

use std::path::Path;

use log::debug;

pub use error::MatError;
pub use value::{CellArray, CharArray, MatClass, MatValue, NumericArray, StructArray};

/// A decoded MAT file: its header text and named top-level variables
#[derive(Debug, Clone, PartialEq)]
pub struct MatFile {
    header: String,
    variables: Vec<(String, MatValue)>,
}

impl MatFile {
    /// Read and decode a MAT file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MatError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a MAT file held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MatError> {
        let header = reader::read_header(bytes)?;
        let variables = reader::read_variables(bytes, header.endian)?;
        debug!(
            "Decoded MAT file with {} variables ({:?})",
            variables.len(),
            header.endian
        );
        Ok(Self {
            header: header.text,
            variables,
        })
    }

    /// The descriptive header text
    pub fn header_text(&self) -> &str {
        &self.header
    }

    /// Look up a top-level variable
    pub fn get(&self, name: &str) -> Option<&MatValue> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Variable names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate over `(name, value)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatValue)> {
        self.variables.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if the file holds no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
