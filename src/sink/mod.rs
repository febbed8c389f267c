//! Digest sinks
//!
//! A sink is a named, stateful accumulator. The engine feeds it every block of
//! a source in stream order through [`Sink::process`]; [`Sink::result`] renders
//! the digest of everything seen so far without touching the accumulator.
//!
//! ## Available sinks
//!
//! | name       | kind                     |
//! |------------|--------------------------|
//! | `md5`      | cryptographic hash       |
//! | `sha1`     | cryptographic hash       |
//! | `sha2-256` | cryptographic hash       |
//! | `sha2-512` | cryptographic hash       |
//! | `sha3-256` | cryptographic hash (`sha3` feature) |
//! | `sha3-512` | cryptographic hash (`sha3` feature) |
//! | `blake2b`  | cryptographic hash       |
//! | `blake3`   | cryptographic hash       |
//! | `xxh3`     | non-cryptographic hash   |
//! | `xxh64`    | non-cryptographic hash   |
//! | `crc32`    | checksum                 |
//! | `entropy`  | Shannon entropy          |

mod entropy;
mod hash;

pub use entropy::EntropySink;
pub use hash::HashSink;

use std::fmt;

use crate::common::hash::HashAlgorithm;
use crate::error::Result;

/// Stateful digest accumulator fed one block at a time
///
/// `Send` is required because successive blocks may be processed on different
/// worker threads; the engine never runs two `process` calls on one sink at
/// the same time.
pub trait Sink: Send {
    /// Stable identifier used in reports
    fn name(&self) -> &str;

    /// Fold the next chunk of the stream into the accumulator
    ///
    /// The result must not depend on how the stream was split into chunks.
    fn process(&mut self, data: &[u8]) -> Result<()>;

    /// Digest of all data processed so far
    fn result(&self) -> String;
}

impl fmt::Debug for dyn Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name()).finish()
    }
}

// =============================================================================
// Sink Registry
// =============================================================================

/// Constructor for one kind of sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Hash(HashAlgorithm),
    Entropy,
}

impl SinkKind {
    /// Every sink compiled into this build
    pub fn available() -> Vec<SinkKind> {
        HashAlgorithm::ALL
            .iter()
            .copied()
            .map(SinkKind::Hash)
            .chain(std::iter::once(SinkKind::Entropy))
            .collect()
    }

    /// The cryptographic hash sinks
    pub fn hashes() -> Vec<SinkKind> {
        HashAlgorithm::ALL
            .iter()
            .copied()
            .filter(HashAlgorithm::is_cryptographic)
            .filter(|algorithm| !matches!(algorithm, HashAlgorithm::Blake2 | HashAlgorithm::Blake3))
            .map(SinkKind::Hash)
            .collect()
    }

    /// Look a sink up by report name or alias
    pub fn parse(name: &str) -> Option<SinkKind> {
        if name.trim().eq_ignore_ascii_case("entropy") {
            return Some(SinkKind::Entropy);
        }
        HashAlgorithm::parse(name).map(SinkKind::Hash)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SinkKind::Hash(algorithm) => algorithm.name(),
            SinkKind::Entropy => "entropy",
        }
    }

    /// Fresh sink with empty state
    pub fn create(&self) -> Box<dyn Sink> {
        match self {
            SinkKind::Hash(algorithm) => Box::new(HashSink::new(*algorithm)),
            SinkKind::Entropy => Box::new(EntropySink::new()),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instantiate one fresh sink per kind, preserving order
pub fn create_sinks(kinds: &[SinkKind]) -> Vec<Box<dyn Sink>> {
    kinds.iter().map(SinkKind::create).collect()
}
