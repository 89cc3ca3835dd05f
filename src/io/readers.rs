use std::collections::BTreeMap;
use std::fs;

use log::{debug, info};
use serde::Serialize;

use super::locator::{select_by_suffix, FileLocator, FileQuery, FileRole, Processing};
use super::sensors::{ChannelInfo, SensorArrayReader, SensorOptions};
use crate::annotations::{parse_annotations, Annotations};
use crate::error::HcpError;
use crate::matfile::{MatFile, MatValue};

/// Suffix of the bad-channel annotation file
pub const BAD_CHANNELS_SUFFIX: &str = "baddata_badchannels.txt";
/// Suffix of the bad-segment annotation file
pub const BAD_SEGMENTS_SUFFIX: &str = "baddata_badsegments.txt";
/// Suffix of the ICA classification text dump
pub const ICA_TEXT_SUFFIX: &str = "icaclass_vs.txt";
/// Suffix of the ICA classification MAT file
pub const ICA_MAT_SUFFIX: &str = "icaclass.mat";
/// Variable holding the ICA classification struct
pub const ICA_VAR: &str = "comp_class";
/// Variable holding the trial definitions
pub const TRIAL_INFO_VAR: &str = "trlInfo";
/// File name of the acquisition config in an unprocessed run
pub const CONFIG_FILE: &str = "config";

/// Trial definitions of one time-lock
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialLock {
    /// Description of each column of the trial matrix
    pub comments: Vec<String>,
    /// Rows of the trial matrix
    pub codes: Vec<Vec<f64>>,
}

/// Trial definitions keyed by lock name (e.g. `TIM`, `RESP`)
pub type TrialInfo = BTreeMap<String, TrialLock>;

fn locate(
    locator: &dyn FileLocator,
    subject: &str,
    data_type: &str,
    role: FileRole,
    processing: Processing,
    run_index: usize,
) -> Result<Vec<std::path::PathBuf>, HcpError> {
    let query = FileQuery::new(subject, data_type, role, processing, run_index);
    let paths = locator.locate(&query)?;
    debug!(
        "Located {} {} files for {} {} run {}",
        paths.len(),
        role,
        subject,
        data_type,
        run_index
    );
    Ok(paths)
}

/// Read the bad channels, bad segments and ICA classification of a run
pub fn read_annotations(
    locator: &dyn FileLocator,
    subject: &str,
    data_type: &str,
    run_index: usize,
) -> Result<Annotations, HcpError> {
    let bads = locate(
        locator,
        subject,
        data_type,
        FileRole::Bads,
        Processing::Preprocessed,
        run_index,
    )?;
    let channels = fs::read_to_string(select_by_suffix(&bads, BAD_CHANNELS_SUFFIX, subject)?)?;
    let segments = fs::read_to_string(select_by_suffix(&bads, BAD_SEGMENTS_SUFFIX, subject)?)?;

    let ica = locate(
        locator,
        subject,
        data_type,
        FileRole::Ica,
        Processing::Preprocessed,
        run_index,
    )?;
    let ica = fs::read_to_string(select_by_suffix(&ica, ICA_TEXT_SUFFIX, subject)?)?;

    parse_annotations(&channels, &segments, &ica)
}

/// Read the ICA classification struct (`comp_class`) of a run
pub fn read_ica_mat(
    locator: &dyn FileLocator,
    subject: &str,
    data_type: &str,
    run_index: usize,
) -> Result<MatValue, HcpError> {
    let ica = locate(
        locator,
        subject,
        data_type,
        FileRole::Ica,
        Processing::Preprocessed,
        run_index,
    )?;
    let mat = MatFile::open(select_by_suffix(&ica, ICA_MAT_SUFFIX, subject)?)?;
    mat.get(ICA_VAR)
        .cloned()
        .ok_or_else(|| HcpError::MissingField(ICA_VAR.to_string()))
}

/// Read the trial definitions of a run.
///
/// The first preprocessed `meg_data` file is expected to hold a `trlInfo`
/// struct with one entry per lock in `lockNames`, `trlColDescr` and
/// `lockTrl`.
pub fn read_trial_info(
    locator: &dyn FileLocator,
    subject: &str,
    data_type: &str,
    run_index: usize,
) -> Result<TrialInfo, HcpError> {
    let paths = locate(
        locator,
        subject,
        data_type,
        FileRole::MegData,
        Processing::Preprocessed,
        run_index,
    )?;
    let path = paths
        .first()
        .ok_or_else(|| HcpError::missing_artifact(subject, TRIAL_INFO_VAR))?;
    let mat = MatFile::open(path)?;
    let trial_info = trial_info_from_mat(&mat)?;
    info!(
        "Read trial info for {} locks from {}",
        trial_info.len(),
        path.display()
    );
    Ok(trial_info)
}

/// Decode a `trlInfo` struct from an already opened MAT file
pub fn trial_info_from_mat(mat: &MatFile) -> Result<TrialInfo, HcpError> {
    let trl_info = mat
        .get(TRIAL_INFO_VAR)
        .ok_or_else(|| HcpError::MissingField(TRIAL_INFO_VAR.to_string()))?;
    let field = |name: &str| {
        trl_info
            .field(0, name)
            .ok_or_else(|| HcpError::MissingField(format!("{}.{}", TRIAL_INFO_VAR, name)))
    };

    let lock_names = strings(field("lockNames")?);
    let descriptions = elements(field("trlColDescr")?);
    let trials = elements(field("lockTrl")?);

    let mut out = TrialInfo::new();
    for (idx, lock_name) in lock_names.into_iter().enumerate() {
        let comments = descriptions.get(idx).map(|v| strings(v)).unwrap_or_default();
        let codes = match trials.get(idx).and_then(|v| v.as_numeric()) {
            Some(matrix) => (0..matrix.rows())
                .map(|row| {
                    matrix.row(row).ok_or_else(|| {
                        HcpError::invalid_value("lockTrl", format!("row {} missing", row))
                    })
                })
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        out.insert(lock_name, TrialLock { comments, codes });
    }
    Ok(out)
}

/// Read the measurement info of a run through a sensor-array reader
pub fn read_info(
    locator: &dyn FileLocator,
    reader: &dyn SensorArrayReader,
    options: &SensorOptions,
    subject: &str,
    data_type: &str,
    run_index: usize,
) -> Result<ChannelInfo, HcpError> {
    let paths = locate(
        locator,
        subject,
        data_type,
        FileRole::MegData,
        Processing::Unprocessed,
        run_index,
    )?;
    let config = paths
        .iter()
        .find(|path| path.file_name().and_then(|n| n.to_str()) == Some(CONFIG_FILE))
        .ok_or_else(|| HcpError::missing_artifact(subject, CONFIG_FILE))?;
    reader.read_info(config, options)
}

/// Strings of a cell array of char arrays, or the rows of a char array
fn strings(value: &MatValue) -> Vec<String> {
    match value {
        MatValue::Char(chars) => chars.rows(),
        MatValue::Cell(_) => elements(value)
            .into_iter()
            .filter_map(MatValue::as_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Cell contents, or the value itself for a lone entry
fn elements(value: &MatValue) -> Vec<&MatValue> {
    match value.cells() {
        Some(cells) => cells.iter().collect(),
        None => vec![value],
    }
}
