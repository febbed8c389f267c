use crate::common::entropy::ByteHistogram;
use crate::error::Result;

use super::Sink;

/// Sink computing the Shannon entropy of the byte stream
///
/// Result is bits per byte with eight decimals, `0.00000000` for empty input.
#[derive(Clone, Debug, Default)]
pub struct EntropySink {
    histogram: ByteHistogram,
}

impl EntropySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_seen(&self) -> u64 {
        self.histogram.total()
    }
}

impl Sink for EntropySink {
    fn name(&self) -> &str {
        "entropy"
    }

    fn process(&mut self, data: &[u8]) -> Result<()> {
        self.histogram.add(data);
        Ok(())
    }

    fn result(&self) -> String {
        format!("{:.8}", self.histogram.entropy())
    }
}
