//! Digestive: many digests, one read
//!
//! Every input is read once, block by block, and each block is handed to all
//! selected sinks (hashes, entropy) in parallel before the next one is
//! released. Forensic images in EWF format are decoded on the fly so the
//! digests describe the acquired medium rather than the container.
//!
//! ```text
//!   inputs::expand ─▶ source::for_path ─▶ Engine::process ─▶ report
//!                                              │
//!                              Blocks (two buffers) + sinks on a rayon pool
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod ewf;
pub mod inputs;
pub mod logging;
pub mod progress;
pub mod report;
pub mod sink;
pub mod source;

use std::io::Write;

use tracing::{error, info};

pub use config::Config;
pub use engine::{Engine, EngineConfig};
pub use error::{DigestError, Result};
pub use report::SourceReport;
pub use sink::{Sink, SinkKind};
pub use source::Source;

use progress::{ConsoleProgress, Progress};

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct Summary {
    /// Reports of sources digested completely, in input order
    pub reports: Vec<SourceReport>,
    /// Sources that could not be opened, read or digested
    pub failures: Vec<DigestError>,
}

impl Summary {
    /// 0 when every source succeeded, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.failures.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Digest every configured source, printing each report to `out` as it completes
///
/// A failing source is logged and skipped. Configuration problems and report
/// output failures end the run.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<Summary> {
    config.validate()?;
    let engine = Engine::new(config.engine())?;
    let names: Vec<&str> = config.sinks.iter().map(SinkKind::name).collect();
    info!(
        sinks = %names.join(","),
        jobs = config.jobs,
        block_size = config.block_size,
        "Starting run"
    );

    let mut summary = Summary::default();
    for input in inputs::expand(&config.sources, config.recursive) {
        let outcome = input.and_then(|path| {
            let mut source = source::for_path(&path);
            engine.process(&mut *source, &config.sinks, |id, length| {
                config.progress.map(|mode| Box::new(ConsoleProgress::new(id, length, mode)) as Box<dyn Progress>)
            })
        });

        match outcome {
            Ok(report) => {
                report::write_console(out, &report)?;
                summary.reports.push(report);
            }
            Err(err) if err.is_config() => return Err(err),
            Err(err) => {
                error!("{}", err);
                summary.failures.push(err);
            }
        }
    }

    if let Some(path) = &config.output {
        report::write_json(path, &summary.reports)?;
    }

    info!(
        succeeded = summary.reports.len(),
        failed = summary.failures.len(),
        "Run finished"
    );
    Ok(summary)
}
