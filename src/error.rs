//! Error types for digest runs

use std::io;

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DigestError>;

/// Errors that can occur while digesting sources
///
/// Every variant except `Config` and `Report` is scoped to a single source: the
/// caller reports it and moves on to the next source in a batch.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Identifier invalid, file missing, or forensic image set incomplete/malformed
    #[error("cannot open {source_id}: {reason}")]
    SourceOpen { source_id: String, reason: String },

    /// I/O failure mid-stream
    #[error("read failed on {source_id}: {source}")]
    Read {
        source_id: String,
        #[source]
        source: io::Error,
    },

    /// Read or length query on a source that is not open
    #[error("source {source_id} is not open")]
    SourceClosed { source_id: String },

    /// Internal failure of a sink's accumulator
    #[error("sink {sink} failed: {message}")]
    Sink { sink: String, message: String },

    /// Invalid block size, job count or sink selection
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failure writing reports
    #[error("report output failed: {0}")]
    Report(String),
}

impl DigestError {
    pub fn open(source_id: impl Into<String>, reason: impl ToString) -> Self {
        DigestError::SourceOpen {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn read(source_id: impl Into<String>, source: io::Error) -> Self {
        DigestError::Read {
            source_id: source_id.into(),
            source,
        }
    }

    /// True for errors that reject the whole run rather than one source
    pub fn is_config(&self) -> bool {
        matches!(self, DigestError::Config(_))
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        DigestError::Report(err.to_string())
    }
}
