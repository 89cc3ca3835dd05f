use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod anatomy;
mod annotations;
mod config;
mod landmarks;
mod mat;
mod show_config;
mod transforms;

pub use config::Config;

/// hcpmeg - readers for Human Connectome Project MEG anatomy and annotations
#[derive(Parser)]
#[command(name = "hcpmeg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a `*_MEG_anatomy_transform.txt` dump and print it as JSON
    Transforms {
        /// Transform dump path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Convert translations from millimeters to meters
        #[arg(long)]
        meters: bool,

        /// Print the product of a chain instead, e.g. `inv:spm2bti,bti2spm`
        #[arg(long, value_delimiter = ',', value_name = "CHAIN")]
        compose: Option<Vec<String>>,
    },

    /// Parse a `*_MEG_anatomy_fiducials.txt` or landmark dump
    Landmarks {
        /// Landmark dump path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse the bad-channel, bad-segment and ICA classification files of a run
    Annotations {
        /// `*_baddata_badchannels.txt`
        #[arg(long, value_name = "FILE")]
        channels: Option<PathBuf>,

        /// `*_baddata_badsegments.txt`
        #[arg(long, value_name = "FILE")]
        segments: Option<PathBuf>,

        /// `*_icaclass_vs.txt`
        #[arg(long, value_name = "FILE")]
        ica: Option<PathBuf>,
    },

    /// List the variables of a MAT v5 file
    Mat {
        /// MAT file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Extract the head-model surface and head -> MRI transform of a subject
    Anatomy {
        /// Subject identifier, e.g. 100307
        #[arg(value_name = "SUBJECT")]
        subject: String,

        /// Structural release (directory or ZIP)
        #[arg(long, value_name = "PATH")]
        structural: PathBuf,

        /// MEG anatomy release (directory or ZIP)
        #[arg(long, value_name = "PATH")]
        meg_anatomy: PathBuf,

        /// Output directory; artifacts go to `<OUTPUT>/<SUBJECT>/bem/`
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Keep millimeters instead of converting to meters
        #[arg(long)]
        keep_mm: bool,

        /// Transform-table entry mapping the device to the structural scan
        #[arg(long, value_name = "NAME")]
        device_transform: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// TOML config file to merge over the defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Transforms {
            file,
            meters,
            compose,
        } => transforms::run(file, meters, compose),
        Commands::Landmarks { file } => landmarks::run(file),
        Commands::Annotations { channels, segments, ica } => annotations::run(channels, segments, ica),
        Commands::Mat { file } => mat::run(file),
        Commands::Anatomy {
            subject,
            structural,
            meg_anatomy,
            output,
            config,
            keep_mm,
            device_transform,
        } => anatomy::run(
            subject,
            structural,
            meg_anatomy,
            output,
            config,
            keep_mm,
            device_transform,
        ),
        Commands::Config { config } => show_config::run(config),
    }
}

/// Write `value` to stdout as pretty JSON
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    std::io::Write::write_all(&mut handle, b"\n")?;
    Ok(())
}

/// Read a text input, naming the file on failure
fn read_text(path: &std::path::Path) -> Result<String> {
    use anyhow::Context;
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
