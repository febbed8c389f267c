//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::progress::ProgressMode;

/// Run several digest algorithms over the same data in a single pass
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "digestive",
    version,
    about = "Run several digest algorithms over the same data in a single pass",
    long_about = "Reads every FILE once, block by block, and feeds each block to all selected \n\
                  sinks in parallel. Forensic images (E01/L01/S01) are decoded and the \n\
                  acquired medium is digested instead of the container."
)]
pub struct Cli {
    /// MD5 hash
    #[arg(short = 'm', long, action = ArgAction::SetTrue)]
    pub md5: bool,

    /// SHA-1 hash
    #[arg(short = '1', long, action = ArgAction::SetTrue)]
    pub sha1: bool,

    /// SHA-2 256-bit hash
    #[arg(short = '2', long, action = ArgAction::SetTrue)]
    pub sha256: bool,

    /// SHA-2 512-bit hash
    #[arg(short = '5', long, action = ArgAction::SetTrue)]
    pub sha512: bool,

    /// SHA-3 256-bit hash
    #[cfg(feature = "sha3")]
    #[arg(long = "sha3-256", action = ArgAction::SetTrue)]
    pub sha3_256: bool,

    /// SHA-3 512-bit hash
    #[cfg(feature = "sha3")]
    #[arg(long = "sha3-512", action = ArgAction::SetTrue)]
    pub sha3_512: bool,

    /// Shannon entropy in bits per byte
    #[arg(short = 'e', long, action = ArgAction::SetTrue)]
    pub entropy: bool,

    /// Every cryptographic hash (MD5, SHA-1, SHA-2, SHA-3)
    #[arg(long, action = ArgAction::SetTrue)]
    pub hashes: bool,

    /// Any available sink by name, e.g. blake3 or crc32 (repeatable)
    #[arg(short = 's', long = "sink", value_name = "NAME")]
    pub sinks: Vec<String>,

    /// Worker threads (default: one per selected sink)
    #[arg(short = 'j', long, env = "DIGESTIVE_JOBS")]
    pub jobs: Option<usize>,

    /// Block size in bytes, K/M/G suffixes allowed (default: 1M)
    #[arg(short = 'b', long, value_name = "SIZE", env = "DIGESTIVE_BLOCK_SIZE")]
    pub block_size: Option<String>,

    /// Descend into directories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Show progress on stderr
    #[arg(short = 'p', long, value_enum, value_name = "MODE", num_args = 0..=1, default_missing_value = "bytes")]
    pub progress: Option<ProgressMode>,

    /// Also write all reports to FILE as JSON
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Files, directories or forensic image segments to digest
    #[arg(value_name = "FILE", required = true)]
    pub sources: Vec<PathBuf>,
}
