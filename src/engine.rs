//! Dispatch engine
//!
//! Drives one source through every selected sink in a single pass:
//!
//! ```text
//!   driving thread                 worker pool (jobs threads)
//!   ──────────────                 ──────────────────────────
//!   read block 0 -> A
//!   spawn sink tasks on A   ───▶   sink[0].process(A) ... sink[n].process(A)
//!   read block 1 -> B              (still running)
//!   barrier: wait for A tasks ◀──  done
//!   progress.set(total)
//!   spawn sink tasks on B   ───▶   ...
//!   read block 2 -> A
//! ```
//!
//! The read of block *i + 1* overlaps the sink work on block *i*. The barrier
//! is the end of a `rayon` scope: no task outlives its block, so a buffer is
//! only refilled after every view into it has been released, and each sink is
//! mutated by one task at a time without locks.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

use crate::error::{DigestError, Result};
use crate::progress::Progress;
use crate::report::SourceReport;
use crate::sink::{create_sinks, Sink, SinkKind};
use crate::source::{Blocks, OpenSource, Source};

pub const DEFAULT_BLOCK_SIZE: usize = 1 << 20;

/// Block size and worker count for a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub block_size: usize,
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            jobs: 1,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(DigestError::Config("block size must be at least 1 byte".into()));
        }
        if self.jobs == 0 {
            return Err(DigestError::Config("job count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Fixed-size worker pool shared by every source of a run
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    pool: ThreadPool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .thread_name(|index| format!("digestive-sink-{}", index))
            .build()
            .map_err(|e| DigestError::Config(format!("cannot start {} workers: {}", config.jobs, e)))?;

        debug!(block_size = config.block_size, jobs = config.jobs, "Engine started");
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed an open source to `sinks`; returns the number of bytes processed
    ///
    /// Every sink sees every block exactly once and in stream order. The first
    /// sink or read failure aborts the pass once the current block's tasks have
    /// settled; the sinks then hold partial state and must be discarded.
    pub fn run<S: Source + ?Sized>(
        &self,
        source: &mut S,
        sinks: &mut [Box<dyn Sink>],
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<u64> {
        if sinks.is_empty() {
            return Err(DigestError::Config("at least one sink is required".into()));
        }

        let source_id = source.id().to_string();
        let mut blocks = Blocks::new(source, self.config.block_size);
        let mut processed = 0u64;
        let mut index = 0usize;
        let mut length = blocks.prime()?;

        while length > 0 {
            trace!(source = %source_id, block = index, length, "Dispatching block");
            let (block, prefetch) = blocks.split();
            let mut outcomes: Vec<Result<()>> = sinks.iter().map(|_| Ok(())).collect();

            let next = self.pool.in_place_scope(|scope| {
                for (sink, outcome) in sinks.iter_mut().zip(outcomes.iter_mut()) {
                    scope.spawn(move |_| *outcome = sink.process(block));
                }
                prefetch.read()
            });

            // Barrier passed: no task still borrows `block`
            if let Some(err) = outcomes.into_iter().find_map(Result::err) {
                return Err(err);
            }
            processed += length as u64;
            if let Some(progress) = progress.as_deref_mut() {
                progress.set(processed);
            }

            let filled = next?;

            length = blocks.rotate(filled);
            index += 1;
        }

        trace!(source = %source_id, blocks = index, processed, "Source exhausted");
        Ok(processed)
    }

    /// Open a source, digest it with fresh sinks and build its report
    ///
    /// `observe` receives the source id and length once the source is open and
    /// may return a progress observer for this source. The source is closed on
    /// every exit path. No report is produced unless the whole pass succeeds.
    pub fn process<S, F>(&self, source: &mut S, kinds: &[SinkKind], observe: F) -> Result<SourceReport>
    where
        S: Source + ?Sized,
        F: FnOnce(&str, u64) -> Option<Box<dyn Progress>>,
    {
        if kinds.is_empty() {
            return Err(DigestError::Config("at least one sink is required".into()));
        }

        let mut source = OpenSource::open(source)?;
        let length = source.length()?;
        let mut sinks = create_sinks(kinds);
        let mut progress = observe(source.id(), length);
        let observer = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);

        let processed = match self.run(&mut *source, &mut sinks, observer) {
            Ok(processed) => processed,
            Err(err) => {
                warn!(source = source.id(), error = %err, "Source aborted");
                return Err(err);
            }
        };

        if processed != length {
            warn!(source = source.id(), length, processed, "Source length changed while reading");
        }
        Ok(SourceReport::from_sinks(source.id(), processed, &sinks))
    }
}
