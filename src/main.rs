//! # hcpmeg
//!
//! Command-line front end for the `hcpmeg` library.
//!
//! ## Usage
//!
//! ```bash
//! # Print the transform table of a subject, translations in meters
//! hcpmeg transforms 100307_MEG_anatomy_transform.txt --meters
//!
//! # Compose a chain (the last link is applied first)
//! hcpmeg transforms 100307_MEG_anatomy_transform.txt --compose spm2mri,bti2spm
//!
//! # Extract the head-model surface and head -> MRI transform
//! hcpmeg anatomy 100307 --structural 100307_3T_Structural_preproc.zip \
//!     --meg-anatomy 100307_MEG_anatomy.zip --output subjects
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
