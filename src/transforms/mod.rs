//! # Coordinate transforms
//!
//! HCP MEG anatomy ships a text dump of named 4×4 homogeneous matrices
//! (`bti2spm`, `spm2bti`, ...) relating the BTi/4D head frame, the SPM frame
//! and the structural image. Translations are written in millimeters.
//!
//! This module parses those dumps into a [`TransformTable`], offers lookup,
//! inversion and composition of named transforms, and reads the bare 4×4
//! RAS matrix that accompanies the structural scan.
//!
//! ```rust
//! use hcpmeg::transforms::{parse_transforms, TransformRef};
//!
//! let text = "transform.a2b = [1 0 0 10\n0 1 0 20\n0 0 1 30\n0 0 0 1];";
//! let table = parse_transforms(text, true)?;
//! let a2b = table.get("a2b")?;
//! assert_eq!(a2b.translation().x, 0.01);
//!
//! let roundtrip = table.compose(&[TransformRef::inverse("a2b"), TransformRef::forward("a2b")])?;
//! assert!(roundtrip.abs_diff_eq(&hcpmeg::transforms::Transform::IDENTITY, 1e-12));
//! # Ok::<(), hcpmeg::HcpError>(())
//! ```

mod record;
mod table;
mod transform;


pub use record::{CoordFrame, TransformRecord};
pub use table::{parse_transforms, read_ras_transform, TransformRef, TransformTable, INVERSE_PREFIX};
pub use transform::{Transform, MM_PER_M};
