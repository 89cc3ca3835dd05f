use anyhow::{Context, Result};
use hcpmeg::anatomy::{open_source, AnatomyPipeline};
use std::path::PathBuf;

use super::{print_json, Config};

/// Run the anatomy pipeline for one subject
pub fn run(
    subject: String,
    structural: PathBuf,
    meg_anatomy: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    keep_mm: bool,
    device_transform: Option<String>,
) -> Result<()> {
    let mut anatomy = Config::load(config.as_deref())?.anatomy;
    if keep_mm {
        anatomy.convert_to_meter = false;
    }
    if let Some(name) = device_transform {
        anatomy.device_to_structural = name;
    }

    let structural = open_source(&structural)
        .with_context(|| format!("Failed to open {}", structural.display()))?;
    let meg_anatomy = open_source(&meg_anatomy)
        .with_context(|| format!("Failed to open {}", meg_anatomy.display()))?;

    let result = AnatomyPipeline::new(anatomy)
        .run(&subject, structural.as_ref(), meg_anatomy.as_ref(), &output)
        .with_context(|| format!("Anatomy extraction failed for subject {}", subject))?;
    print_json(&result)
}
