use crate::common::hash::{HashAlgorithm, StreamingHasher};
use crate::error::Result;

use super::Sink;

/// Sink computing a hash digest, rendered as lower-case hex
#[derive(Clone)]
pub struct HashSink {
    algorithm: HashAlgorithm,
    hasher: StreamingHasher,
}

impl HashSink {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            hasher: StreamingHasher::new(algorithm),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl Sink for HashSink {
    fn name(&self) -> &str {
        self.algorithm.name()
    }

    fn process(&mut self, data: &[u8]) -> Result<()> {
        self.hasher.update(data);
        Ok(())
    }

    fn result(&self) -> String {
        // finalize consumes the hasher; work on a copy so results stay repeatable
        self.hasher.clone().finalize()
    }
}
