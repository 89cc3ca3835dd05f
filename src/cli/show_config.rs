use anyhow::Result;
use std::path::PathBuf;

use super::Config;

/// Print the configuration after merging `config` over the defaults
pub fn run(config: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}
