//! Bad-channel, bad-segment and ICA classification annotations
//!
//! The three files share the statement syntax and differ only in how the
//! value of each statement is read. They are curated by hand, so fragments
//! that do not split into a key and a value are skipped rather than
//! rejected; an empty file yields an empty map.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::error::HcpError;
use crate::text::{
    parse_index_pairs, parse_mixed_list, parse_string_list, ListItem, Statement, Tokenizer,
    TokenizerConfig,
};

/// Bad channel names per key (e.g. `badchannels`, `all`)
pub type BadChannels = BTreeMap<String, Vec<String>>;

/// Closed, 0-based sample ranges per key
pub type BadSegments = BTreeMap<String, Vec<[usize; 2]>>;

/// ICA components or labels per category (e.g. `brain`, `ecg_eog`)
pub type IcaClassification = BTreeMap<String, Vec<ListItem>>;

/// All annotations for one recording
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotations {
    /// Contents of `baddata_badchannels.txt`
    pub channels: BadChannels,
    /// Contents of `baddata_badsegments.txt`
    pub segments: BadSegments,
    /// Contents of `icaclass_vs.txt`
    pub ica: IcaClassification,
}

/// Parse the three annotation files of a recording
pub fn parse_annotations(
    channels_text: &str,
    segments_text: &str,
    ica_text: &str,
) -> Result<Annotations, HcpError> {
    Ok(Annotations {
        channels: parse_bad_channels(channels_text),
        segments: parse_bad_segments(segments_text)?,
        ica: parse_ica_classification(ica_text),
    })
}

/// Bad channels: each value is a list of quoted channel names.
pub fn parse_bad_channels(text: &str) -> BadChannels {
    let out: BadChannels = statements(text)
        .map(|statement| {
            let names = parse_string_list(&statement.value);
            (statement.key, names)
        })
        .collect();
    debug!("Parsed {} bad-channel entries", out.len());
    out
}

/// Bad segments: each value is a list of 1-based `[start end]` pairs.
///
/// Boundaries are shifted to 0-based and kept inclusive. A boundary of 0
/// or an odd number of boundaries is an error, since it means the file
/// does not follow the segment grammar at all.
pub fn parse_bad_segments(text: &str) -> Result<BadSegments, HcpError> {
    let out = statements(text)
        .map(|statement| {
            let pairs = parse_index_pairs(&statement.key, &statement.value)?;
            Ok((statement.key, pairs))
        })
        .collect::<Result<BadSegments, HcpError>>()?;
    debug!("Parsed {} bad-segment entries", out.len());
    Ok(out)
}

/// ICA classification: component index lists and label lists.
pub fn parse_ica_classification(text: &str) -> IcaClassification {
    let out: IcaClassification = statements(text)
        .map(|statement| {
            let items = parse_mixed_list(&statement.value);
            (statement.key, items)
        })
        .collect();
    debug!("Parsed {} ICA classification entries", out.len());
    out
}

fn statements(text: &str) -> impl Iterator<Item = Statement> + '_ {
    Tokenizer::new(text, TokenizerConfig::default()).skip_malformed()
}
