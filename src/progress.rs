//! Progress observation for a digest run
//!
//! The engine calls [`Progress::set`] with the cumulative byte count after each
//! completed block. [`ProgressState`] keeps the accounting; [`ConsoleProgress`]
//! renders it on stderr. Any `FnMut(u64)` closure is also a [`Progress`].

use std::time::{Duration, Instant};

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

use crate::common::format::{file_size, throughput};

/// Receiver of cumulative progress, called once per completed block
pub trait Progress {
    fn set(&mut self, processed: u64);
}

impl<F: FnMut(u64)> Progress for F {
    fn set(&mut self, processed: u64) {
        self(processed)
    }
}

/// What the console line shows next to the bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    /// Cumulative bytes against the source length
    #[default]
    Bytes,
    /// Bytes per second since the source was opened
    Speed,
}

#[derive(Clone, Debug)]
pub struct ProgressState {
    processed: u64,
    start: Instant,
    total: u64,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self::started_at(total, Instant::now())
    }

    pub fn started_at(total: u64, start: Instant) -> Self {
        Self {
            processed: 0,
            start,
            total,
        }
    }

    pub fn set(&mut self, processed: u64) {
        self.processed = processed;
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Nothing is displayed for zero-length sources
    pub fn is_suppressed(&self) -> bool {
        self.total == 0
    }

    /// Seconds since start, never less than one
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64().max(1.0)
    }

    pub fn bytes_per_second(&self) -> f64 {
        self.processed as f64 / self.elapsed_secs()
    }

    /// Completed fraction in `0.0..=1.0`, `None` when suppressed
    pub fn fraction(&self) -> Option<f64> {
        if self.is_suppressed() {
            return None;
        }
        Some((self.processed as f64 / self.total as f64).min(1.0))
    }

    pub fn render(&self, mode: ProgressMode) -> String {
        match mode {
            ProgressMode::Bytes => format!("{} / {}", file_size(self.processed), file_size(self.total)),
            ProgressMode::Speed => throughput(self.bytes_per_second()),
        }
    }
}

/// Progress bar on stderr for one source
pub struct ConsoleProgress {
    state: ProgressState,
    mode: ProgressMode,
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(label: &str, total: u64, mode: ProgressMode) -> Self {
        let state = ProgressState::new(total);
        let bar = if state.is_suppressed() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total);
            bar.set_style(Self::bar_style());
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(200));
            bar
        };
        Self { state, mode, bar }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }
}

impl Progress for ConsoleProgress {
    fn set(&mut self, processed: u64) {
        self.state.set(processed);
        if self.state.is_suppressed() {
            return;
        }
        self.bar.set_position(processed);
        self.bar.set_message(self.state.render(self.mode));
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_is_suppressed() {
        let mut state = ProgressState::new(0);
        state.set(0);
        assert!(state.is_suppressed());
        assert_eq!(state.fraction(), None);

        let mut console = ConsoleProgress::new("empty", 0, ProgressMode::Speed);
        console.set(0);
        assert!(console.bar.is_hidden());
        assert_eq!(console.state().processed(), 0);
    }

    #[test]
    fn test_elapsed_is_floored_to_one_second() {
        let mut state = ProgressState::new(4096);
        state.set(2048);
        assert_eq!(state.elapsed_secs(), 1.0);
        assert_eq!(state.bytes_per_second(), 2048.0);
        assert_eq!(state.render(ProgressMode::Speed), "2 KiB/s");
    }

    #[test]
    fn test_throughput_over_elapsed_time() {
        let start = Instant::now()
            .checked_sub(Duration::from_secs(4))
            .expect("clock supports subtracting 4 seconds");
        let mut state = ProgressState::started_at(1 << 20, start);
        state.set(1 << 20);
        let rate = state.bytes_per_second();
        assert!(rate <= (1 << 18) as f64);
        assert!(rate > (1 << 17) as f64);
    }

    #[test]
    fn test_render_bytes() {
        let mut state = ProgressState::new(1024);
        state.set(512);
        assert_eq!(state.render(ProgressMode::Bytes), "512 bytes / 1 KiB");
        assert_eq!(state.fraction(), Some(0.5));
    }

    #[test]
    fn test_closure_progress() {
        let mut seen = Vec::new();
        {
            let mut record = |processed: u64| seen.push(processed);
            let progress: &mut dyn Progress = &mut record;
            progress.set(10);
            progress.set(20);
        }
        assert_eq!(seen, vec![10, 20]);
    }
}
