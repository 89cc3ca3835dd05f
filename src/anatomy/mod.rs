//! # Anatomy extraction
//!
//! Turns a subject's structural release (for the `c_ras.mat` RAS offset) and
//! MEG anatomy release (transform dump and FieldTrip head model) into two
//! artifacts:
//!
//! ```text
//! <out>/<subject>/bem/
//! ├── inner_skull.off                   # head-model surface in MRI coordinates
//! └── <subject>-head_mri-trans.json     # head -> MRI transform record
//! ```
//!
//! Releases can be unpacked directories ([`DirectorySource`]) or ZIP
//! archives ([`ZipSource`]); [`open_source`] picks one from a path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use hcpmeg::anatomy::{open_source, AnatomyConfig, AnatomyPipeline};
//!
//! let structural = open_source("100307_3T_Structural_preproc.zip")?;
//! let meg_anatomy = open_source("100307_MEG_anatomy.zip")?;
//! let output = AnatomyPipeline::new(AnatomyConfig::default()).run(
//!     "100307",
//!     structural.as_ref(),
//!     meg_anatomy.as_ref(),
//!     Path::new("subjects"),
//! )?;
//! println!("{} vertices", output.vertex_count);
//! # Ok::<(), hcpmeg::HcpError>(())
//! ```

mod config;
mod pipeline;
mod source;


pub use config::{AnatomyConfig, LengthUnit};
pub use pipeline::{AnatomyOutput, AnatomyPipeline, BEM_DIR};
pub use source::{open_source, ArtifactSource, DirectorySource, ZipSource};
