//! Validated run configuration
//!
//! [`Config::from_cli`] turns parsed arguments into the engine-facing form and
//! rejects anything unusable before a single source is opened.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::common::hash::HashAlgorithm;
use crate::engine::{EngineConfig, DEFAULT_BLOCK_SIZE};
use crate::error::{DigestError, Result};
use crate::progress::ProgressMode;
use crate::sink::SinkKind;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Selected sinks, deduplicated, in request order
    pub sinks: Vec<SinkKind>,
    pub block_size: usize,
    pub jobs: usize,
    pub recursive: bool,
    pub progress: Option<ProgressMode>,
    pub output: Option<PathBuf>,
    pub sources: Vec<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sinks = selected_sinks(cli)?;
        let block_size = match &cli.block_size {
            Some(size) => parse_block_size(size)?,
            None => DEFAULT_BLOCK_SIZE,
        };
        let jobs = cli.jobs.unwrap_or(sinks.len());

        let config = Self {
            sinks,
            block_size,
            jobs,
            recursive: cli.recursive,
            // Quiet runs draw nothing on stderr
            progress: cli.progress.filter(|_| !cli.quiet),
            output: cli.output.clone(),
            sources: cli.sources.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sinks.is_empty() {
            return Err(DigestError::Config("at least one sink is required".into()));
        }
        if self.sources.is_empty() {
            return Err(DigestError::Config("at least one source is required".into()));
        }
        self.engine().validate()
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            block_size: self.block_size,
            jobs: self.jobs,
        }
    }
}

fn selected_sinks(cli: &Cli) -> Result<Vec<SinkKind>> {
    let mut requested = Vec::new();
    let mut flag = |enabled: bool, algorithm: HashAlgorithm| {
        if enabled {
            requested.push(SinkKind::Hash(algorithm));
        }
    };
    flag(cli.md5, HashAlgorithm::Md5);
    flag(cli.sha1, HashAlgorithm::Sha1);
    flag(cli.sha256, HashAlgorithm::Sha256);
    flag(cli.sha512, HashAlgorithm::Sha512);
    #[cfg(feature = "sha3")]
    {
        flag(cli.sha3_256, HashAlgorithm::Sha3_256);
        flag(cli.sha3_512, HashAlgorithm::Sha3_512);
    }

    if cli.hashes {
        requested.extend(SinkKind::hashes());
    }
    if cli.entropy {
        requested.push(SinkKind::Entropy);
    }
    for name in &cli.sinks {
        let kind = SinkKind::parse(name).ok_or_else(|| {
            let known: Vec<&str> = SinkKind::available().iter().map(SinkKind::name).collect();
            DigestError::Config(format!("unknown sink '{}' (available: {})", name, known.join(", ")))
        })?;
        requested.push(kind);
    }

    let mut sinks: Vec<SinkKind> = Vec::with_capacity(requested.len());
    for kind in requested {
        if !sinks.contains(&kind) {
            sinks.push(kind);
        }
    }
    Ok(sinks)
}

/// Parse a byte count with an optional binary suffix: `4096`, `64K`, `1M`, `2GiB`
pub fn parse_block_size(value: &str) -> Result<usize> {
    let invalid = || DigestError::Config(format!("invalid block size '{}'", value));

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    let number: usize = digits.parse().map_err(|_| invalid())?;

    let shift = match suffix.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 10,
        "M" | "MB" | "MIB" => 20,
        "G" | "GB" | "GIB" => 30,
        _ => return Err(invalid()),
    };

    let size = number.checked_mul(1usize << shift).ok_or_else(invalid)?;
    if size == 0 {
        return Err(DigestError::Config("block size must be at least 1 byte".into()));
    }
    Ok(size)
}
