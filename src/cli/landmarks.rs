use anyhow::{Context, Result};
use hcpmeg::landmarks::parse_landmarks;
use std::path::PathBuf;

use super::{print_json, read_text};

/// Print landmark positions in meters
pub fn run(file: PathBuf) -> Result<()> {
    let text = read_text(&file)?;
    let landmarks = parse_landmarks(&text)
        .with_context(|| format!("Failed to parse landmarks from {}", file.display()))?;
    print_json(&landmarks)
}
