use anyhow::{Context, Result};
use hcpmeg::annotations::parse_annotations;
use std::path::{Path, PathBuf};

use super::{print_json, read_text};

/// Print the annotations of a run; omitted files count as empty
pub fn run(channels: Option<PathBuf>, segments: Option<PathBuf>, ica: Option<PathBuf>) -> Result<()> {
    if channels.is_none() && segments.is_none() && ica.is_none() {
        anyhow::bail!("Pass at least one of --channels, --segments or --ica");
    }

    let load = |path: Option<&Path>| -> Result<String> {
        match path {
            Some(path) => read_text(path),
            None => Ok(String::new()),
        }
    };
    let annotations = parse_annotations(
        &load(channels.as_deref())?,
        &load(segments.as_deref())?,
        &load(ica.as_deref())?,
    )
    .context("Failed to parse annotations")?;
    print_json(&annotations)
}
