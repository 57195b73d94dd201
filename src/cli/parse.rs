//! CLI parse: clap types for treehash. No behavior; definitions only.

use crate::tree::hasher::DigestAlgorithm;
use crate::tree::render::RenderMode;
use clap::Parser;
use std::path::PathBuf;

/// Treehash CLI - Merkle digests of directory trees
#[derive(Parser, Debug)]
#[command(name = "treehash", version)]
#[command(about = "Compute a content-addressed Merkle digest of a directory tree")]
pub struct Cli {
    /// Directory to hash
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Maximum number of hashing workers (default: number of CPUs)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Output format
    #[arg(long = "fmt", value_enum)]
    pub format: Option<RenderMode>,

    /// Digest algorithm for files and directories
    #[arg(long, value_enum)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(short, long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
