//! Data structures for digest reports
//!
//! A [`SourceReport`] is produced only after every block of a source has been
//! processed by every sink. These structures serialize directly to the JSON
//! written by `--output`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sink::Sink;

/// Completed digest record for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source identifier (path, or segment range for images)
    pub source: String,
    /// Bytes processed
    pub size: u64,
    /// When the last block finished
    pub completed: DateTime<Utc>,
    /// One entry per sink, in selection order
    pub results: Vec<SinkResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkResult {
    pub sink: String,
    pub result: String,
}

impl SourceReport {
    /// Snapshot the results of fully fed sinks
    pub fn from_sinks(source: impl Into<String>, size: u64, sinks: &[Box<dyn Sink>]) -> Self {
        let results = sinks
            .iter()
            .map(|sink| SinkResult {
                sink: sink.name().to_string(),
                result: sink.result(),
            })
            .collect();

        Self {
            source: source.into(),
            size,
            completed: Utc::now(),
            results,
        }
    }

    /// Result string of the named sink
    pub fn result(&self, sink: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|entry| entry.sink == sink)
            .map(|entry| entry.result.as_str())
    }
}
