use anyhow::{Context, Result};
use hcpmeg::transforms::{parse_transforms, TransformRef};
use serde_json::json;
use std::path::PathBuf;

use super::{print_json, read_text};

/// Print a transform table, or the product of a chain of its entries
pub fn run(file: PathBuf, meters: bool, compose: Option<Vec<String>>) -> Result<()> {
    let text = read_text(&file)?;
    let table = parse_transforms(&text, meters)
        .with_context(|| format!("Failed to parse transforms from {}", file.display()))?;
    log::info!("Parsed {} transforms from {}", table.len(), file.display());

    match compose {
        Some(chain) => {
            let chain: Vec<TransformRef> = chain
                .iter()
                .map(|link| link.trim().parse())
                .collect::<Result<_, _>>()?;
            let composed = table.compose(&chain).context("Failed to compose transforms")?;
            let names: Vec<String> = chain.iter().map(ToString::to_string).collect();
            print_json(&json!({ "chain": names, "trans": composed }))
        }
        None => print_json(&table),
    }
}
