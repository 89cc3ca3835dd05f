//! # hcpmeg - Human Connectome Project MEG readers
//!
//! `hcpmeg` decodes the script-style text dumps written by the HCP MEG
//! pipelines, reconciles the anatomical coordinate frames they reference
//! and extracts the FieldTrip head-model surface from its MAT container.
//!
//! ## Key Features
//!
//! - **One tokenizer, several grammars**: `key = value;` statements are split
//!   by a bracket- and quote-aware scanner ([`text::Tokenizer`]), then each
//!   value is read by the grammar its file calls for.
//!
//! - **Explicit units**: transforms and landmarks are stored in millimeters;
//!   conversion to meters divides translations only, never rotations.
//!
//! - **Transform composition**: named matrices and their inverses combine
//!   into chains such as `inv:ras · bti2spm`.
//!
//! - **MAT v5 reader**: compressed and uncompressed level-5 MAT files are
//!   decoded into navigable struct/cell/numeric trees, enough to pull
//!   `headmodel.bnd.pnt` and `headmodel.bnd.tri` out of a head model.
//!
//! ## Quick Start
//!
//! ```rust
//! use hcpmeg::transforms::{parse_transforms, TransformRef};
//!
//! let text = "transform.bti2spm = [1 0 0 10; 0 1 0 20; 0 0 1 30; 0 0 0 1];";
//! let table = parse_transforms(text, true)?;
//! let bti2spm = table.get("bti2spm")?;
//! assert_eq!(bti2spm.get(0, 3), 0.01);
//!
//! let round_trip = table.compose(&[
//!     TransformRef::inverse("bti2spm"),
//!     TransformRef::forward("bti2spm"),
//! ])?;
//! assert!(round_trip.abs_diff_eq(&hcpmeg::transforms::Transform::IDENTITY, 1e-12));
//! # Ok::<(), hcpmeg::HcpError>(())
//! ```
//!
//! ## Annotations
//!
//! ```rust
//! use hcpmeg::annotations::parse_bad_segments;
//!
//! // Sample ranges are 1-based in the file and 0-based once parsed
//! let segments = parse_bad_segments("badsegments.all = [1 10; 20 30];")?;
//! assert_eq!(segments["all"], vec![[0, 9], [19, 29]]);
//! # Ok::<(), hcpmeg::HcpError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`text`]: statement tokenizer and value grammars
//! - [`transforms`]: 4×4 transforms, named tables, composition, frame records
//! - [`landmarks`]: fiducial landmark files
//! - [`annotations`]: bad channels, bad segments, ICA classification
//! - [`matfile`]: MAT v5 container reader
//! - [`mesh`]: head-model surface extraction and OFF output
//! - [`io`]: run-level readers over a file locator and a sensor-array reader
//! - [`anatomy`]: per-subject anatomy extraction pipeline
//!
//! ## Input Files
//!
//! | File | Reader |
//! |------|--------|
//! | `*_MEG_anatomy_transform.txt` | [`transforms::parse_transforms`] |
//! | `c_ras.mat` (text) | [`transforms::read_ras_transform`] |
//! | `*_MEG_anatomy_fiducials.txt` | [`landmarks::parse_landmarks`] |
//! | `*_baddata_badchannels.txt` | [`annotations::parse_bad_channels`] |
//! | `*_baddata_badsegments.txt` | [`annotations::parse_bad_segments`] |
//! | `*_icaclass_vs.txt` | [`annotations::parse_ica_classification`] |
//! | `*_MEG_anatomy_headmodel.mat` | [`mesh::extract_mesh`] |
//! | `*_icaclass.mat`, `*_tmegpreproc_*.mat` | [`io::read_ica_mat`], [`io::read_trial_info`] |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod anatomy;
pub mod annotations;
mod error;
pub mod io;
pub mod landmarks;
pub mod matfile;
pub mod mesh;
pub mod text;
pub mod transforms;

pub use error::HcpError;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::anatomy::{
        open_source, AnatomyConfig, AnatomyOutput, AnatomyPipeline, ArtifactSource,
        DirectorySource, ZipSource,
    };
    pub use crate::annotations::{
        parse_annotations, parse_bad_channels, parse_bad_segments, parse_ica_classification,
        Annotations,
    };
    pub use crate::io::{
        read_annotations, read_ica_mat, read_info, read_trial_info, ChannelInfo, FileLocator,
        FileQuery, FileRole, Processing, SensorArrayReader, SensorOptions, StaticLocator,
    };
    pub use crate::landmarks::{parse_landmarks, Landmarks};
    pub use crate::matfile::{MatError, MatFile, MatValue};
    pub use crate::mesh::{extract_mesh, Mesh};
    pub use crate::text::{parse_value, tokenize, ListItem, Statement, Tokenizer, Value};
    pub use crate::transforms::{
        parse_transforms, read_ras_transform, CoordFrame, Transform, TransformRecord,
        TransformRef, TransformTable,
    };
    pub use crate::HcpError;
}
