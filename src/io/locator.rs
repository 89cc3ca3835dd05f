use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HcpError;

/// Processing stage of an HCP release directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Processing {
    /// Raw acquisition files (`c,rfDC` and `config`)
    Unprocessed,
    /// Outputs of the HCP MEG pipelines
    Preprocessed,
}

/// Which output of a run is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    /// Sensor data (raw files, or preprocessed MAT files)
    MegData,
    /// Bad channel and bad segment annotations
    Bads,
    /// ICA decomposition and classification
    Ica,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileRole::MegData => "meg_data",
            FileRole::Bads => "bads",
            FileRole::Ica => "ica",
        };
        f.write_str(name)
    }
}

/// A request for the files of one run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileQuery {
    /// Subject identifier, e.g. `100307`
    pub subject: String,
    /// HCP data type, e.g. `rest` or `task_working_memory`
    pub data_type: String,
    /// Requested output
    pub role: FileRole,
    /// Processing stage
    pub processing: Processing,
    /// 0-based run index within the data type
    pub run_index: usize,
}

impl FileQuery {
    /// Build a query
    pub fn new(
        subject: &str,
        data_type: &str,
        role: FileRole,
        processing: Processing,
        run_index: usize,
    ) -> Self {
        Self {
            subject: subject.to_string(),
            data_type: data_type.to_string(),
            role,
            processing,
            run_index,
        }
    }
}

/// Port mapping a [`FileQuery`] to concrete file paths.
///
/// The HCP directory layout is resolved outside this crate; readers only
/// select files from the returned set by suffix.
pub trait FileLocator: Send + Sync {
    /// Paths belonging to the queried run, possibly empty
    fn locate(&self, query: &FileQuery) -> Result<Vec<PathBuf>, HcpError>;
}

/// In-memory locator backed by an explicit table
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    entries: Vec<(FileQuery, Vec<PathBuf>)>,
}

impl StaticLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the paths answering `query`, replacing earlier ones
    pub fn insert<I, P>(&mut self, query: FileQuery, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(q, _)| *q == query) {
            Some((_, existing)) => *existing = paths,
            None => self.entries.push((query, paths)),
        }
    }

    /// Builder form of [`StaticLocator::insert`]
    pub fn with<I, P>(mut self, query: FileQuery, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.insert(query, paths);
        self
    }
}

impl FileLocator for StaticLocator {
    fn locate(&self, query: &FileQuery) -> Result<Vec<PathBuf>, HcpError> {
        Ok(self
            .entries
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, paths)| paths.clone())
            .unwrap_or_default())
    }
}

/// First path whose file name ends with `suffix`
pub(crate) fn select_by_suffix<'a>(
    paths: &'a [PathBuf],
    suffix: &str,
    subject: &str,
) -> Result<&'a Path, HcpError> {
    paths
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix))
        })
        .map(PathBuf::as_path)
        .ok_or_else(|| HcpError::missing_artifact(subject, suffix))
}
