//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use otakit_core::config::{
    ENV_BASE_URL, ENV_DEVICE, ENV_MANIFEST_DIR, ENV_OS_VERSION, ENV_PATH, ENV_SIGNED,
    ENV_TIMESTAMP, ENV_TYPE,
};

/// otakit - release pipeline helpers for OTA builds
#[derive(Parser, Debug)]
#[command(name = "otakit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a new OTA artifact to its device manifest
    Announce(AnnounceArgs),

    /// Summarize porcelain status output as a markdown fragment
    DirtyStatus(DirtyStatusArgs),

    /// Expand a comma-separated target list into a CI matrix
    Targets(TargetsArgs),
}

/// Hashing implementation used for artifact fingerprints
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestBackend {
    /// Built-in streaming SHA256
    #[default]
    Native,
    /// External `sha256sum` utility
    Sha256sum,
}

// Announce command
#[derive(Args, Debug)]
pub struct AnnounceArgs {
    /// Device codename
    #[arg(long, env = ENV_DEVICE)]
    pub device: Option<String>,

    /// Update type, e.g. Nightly
    #[arg(long = "type", env = ENV_TYPE)]
    pub update_type: Option<String>,

    /// Release timestamp (seconds)
    #[arg(long, env = ENV_TIMESTAMP)]
    pub timestamp: Option<String>,

    /// Path to the OTA package
    #[arg(long, env = ENV_PATH)]
    pub path: Option<String>,

    /// "1" if the package is signed with release keys
    #[arg(long, env = ENV_SIGNED, value_name = "FLAG")]
    pub signed: Option<String>,

    /// Base URL the package is downloadable from
    #[arg(long, env = ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// OS version of the package
    #[arg(long, env = ENV_OS_VERSION)]
    pub os_version: Option<String>,

    /// Manifest directory (default: ../ota next to the executable)
    #[arg(long, env = ENV_MANIFEST_DIR)]
    pub manifest_dir: Option<Utf8PathBuf>,

    /// Hashing implementation
    #[arg(long, value_enum, default_value_t = DigestBackend::Native)]
    pub digest: DigestBackend,

    /// Print the new entry as JSON
    #[arg(long)]
    pub json: bool,
}

// Dirty-status command
#[derive(Args, Debug)]
pub struct DirtyStatusArgs {
    /// Files containing status output (default: stdin)
    pub files: Vec<Utf8PathBuf>,
}

// Targets command
#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Target list (default: read from stdin)
    #[arg(long)]
    pub list: Option<String>,
}
