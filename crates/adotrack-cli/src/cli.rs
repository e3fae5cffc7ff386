//! Command line definitions.

use std::path::PathBuf;
use std::str::FromStr;

use adotrack::{DEFAULT_RATING_TOP_N, ProgressKind, SortKey};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "adotrack")]
#[command(version, about = "Workshop level progress tracker")]
pub struct Cli {
    /// Settings file (defaults to <config dir>/adotrack/config.toml)
    #[arg(short, long, global = true, env = "ADOTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the paths in the settings file
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Workshop content folder holding one directory per level
    #[arg(long, global = true, env = "ADOTRACK_INSTALL_ROOT")]
    pub install_root: Option<PathBuf>,

    /// Game save file with custom level progress
    #[arg(long, global = true, env = "ADOTRACK_SAVE_FILE")]
    pub save_file: Option<PathBuf>,

    /// Fingerprint cache file
    #[arg(long, global = true, env = "ADOTRACK_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Level catalog (JSON array of levels)
    #[arg(long, global = true, env = "ADOTRACK_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Hash metadata fields verbatim instead of stripping markup
    #[arg(long, global = true)]
    pub no_strip_markup: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the progress of every level
    Status {
        /// Only show levels in this state (repeatable)
        #[arg(long = "state", value_parser = ProgressKind::from_str)]
        states: Vec<ProgressKind>,

        /// Only show levels whose name or artist contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order: difficulty, name, id or contribution
        #[arg(long, default_value = "difficulty", value_parser = SortKey::from_str)]
        sort: SortKey,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the skill rating and the levels contributing to it
    Rating {
        /// Number of best levels averaged
        #[arg(long, default_value_t = DEFAULT_RATING_TOP_N)]
        top: usize,
    },

    /// Print the metadata and fingerprint of a level
    Fingerprint {
        /// Workshop id of an installed level
        external_id: Option<String>,

        #[arg(long, conflicts_with = "external_id")]
        author: Option<String>,

        #[arg(long, conflicts_with = "external_id")]
        artist: Option<String>,

        #[arg(long, conflicts_with = "external_id")]
        song: Option<String>,
    },

    /// Inspect or reset the fingerprint cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum CacheAction {
    /// List cached fingerprints
    Show,
    /// Remove every cached fingerprint so levels are parsed again
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
