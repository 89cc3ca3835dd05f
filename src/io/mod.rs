//! # Run-level readers
//!
//! Entry points that read the records of one HCP run (annotations, ICA
//! classification, trial definitions, measurement info) through two ports:
//!
//! - [`FileLocator`] maps `(subject, data type, role, processing, run)` to
//!   file paths. [`StaticLocator`] is an in-memory implementation.
//! - [`SensorArrayReader`] decodes the vendor acquisition `config` file.
//!
//! Readers pick the file they need from the located set by suffix and fail
//! with [`HcpError::MissingArtifact`](crate::HcpError::MissingArtifact) when
//! it is absent.

mod locator;
mod readers;
mod sensors;


pub use locator::{FileLocator, FileQuery, FileRole, Processing, StaticLocator};
pub use readers::{
    read_annotations, read_ica_mat, read_info, read_trial_info, trial_info_from_mat, TrialInfo,
    TrialLock, BAD_CHANNELS_SUFFIX, BAD_SEGMENTS_SUFFIX, CONFIG_FILE, ICA_MAT_SUFFIX, ICA_TEXT_SUFFIX,
    ICA_VAR, TRIAL_INFO_VAR,
};
pub use sensors::{ChannelInfo, SensorArrayReader, SensorOptions};
