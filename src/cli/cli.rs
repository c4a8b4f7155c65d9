use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Interactive shell over an in-memory file tree.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory holding treefs.yaml and the exported files
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Read commands from this file instead of stdin
    #[clap(long, short)]
    pub script: Option<PathBuf>,
}
