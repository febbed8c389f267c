// Streaming hash primitives behind the digest sinks
//
// Unified incremental hashing over MD5, SHA-1, SHA-2, SHA-3 (feature `sha3`),
// BLAKE2b, BLAKE3, XXH3, XXH64 and CRC32

use blake2::Blake2b512;
use blake3::Hasher as Blake3Hasher;
use crc32fast::Hasher as Crc32Hasher;
use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};
#[cfg(feature = "sha3")]
use sha3::{Sha3_256, Sha3_512};
use xxhash_rust::xxh3::Xxh3;
use xxhash_rust::xxh64::Xxh64;

// =============================================================================
// Hash Algorithm Enum
// =============================================================================

/// Supported hash algorithms
/// - MD5/SHA1: Legacy algorithms still expected in forensic reports
/// - SHA256/SHA512: NIST approved, court-accepted forensic standards
/// - SHA3-256/SHA3-512: Keccak-based NIST standard (feature `sha3`)
/// - BLAKE3/BLAKE2b: Modern, fast cryptographic hashes
/// - XXH3/XXH64: Ultra-fast non-cryptographic hashes for integrity checks
/// - CRC32: Fast checksum (non-cryptographic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    #[cfg(feature = "sha3")]
    Sha3_256,
    #[cfg(feature = "sha3")]
    Sha3_512,
    Blake2,
    Blake3,
    Xxh3,
    Xxh64,
    Crc32,
}

impl HashAlgorithm {
    /// Every algorithm compiled into this build, in report order
    pub const ALL: &'static [HashAlgorithm] = &[
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        #[cfg(feature = "sha3")]
        HashAlgorithm::Sha3_256,
        #[cfg(feature = "sha3")]
        HashAlgorithm::Sha3_512,
        HashAlgorithm::Blake2,
        HashAlgorithm::Blake3,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Xxh64,
        HashAlgorithm::Crc32,
    ];

    /// Parse algorithm name (case-insensitive, accepts common aliases)
    pub fn parse(algorithm: &str) -> Option<Self> {
        match algorithm.trim().to_lowercase().as_str() {
            "md5" => Some(HashAlgorithm::Md5),
            "sha1" | "sha-1" => Some(HashAlgorithm::Sha1),
            "sha256" | "sha-256" | "sha2-256" => Some(HashAlgorithm::Sha256),
            "sha512" | "sha-512" | "sha2-512" => Some(HashAlgorithm::Sha512),
            #[cfg(feature = "sha3")]
            "sha3-256" | "sha3_256" => Some(HashAlgorithm::Sha3_256),
            #[cfg(feature = "sha3")]
            "sha3-512" | "sha3_512" => Some(HashAlgorithm::Sha3_512),
            "blake2" | "blake2b" => Some(HashAlgorithm::Blake2),
            "blake3" => Some(HashAlgorithm::Blake3),
            "xxh3" | "xxhash3" => Some(HashAlgorithm::Xxh3),
            "xxh64" | "xxhash64" => Some(HashAlgorithm::Xxh64),
            "crc32" => Some(HashAlgorithm::Crc32),
            _ => None,
        }
    }

    /// Stable name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha2-256",
            HashAlgorithm::Sha512 => "sha2-512",
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_256 => "sha3-256",
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_512 => "sha3-512",
            HashAlgorithm::Blake2 => "blake2b",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Xxh64 => "xxh64",
            HashAlgorithm::Crc32 => "crc32",
        }
    }

    /// Cryptographic digests selected by `--hashes`
    pub fn is_cryptographic(&self) -> bool {
        !matches!(
            self,
            HashAlgorithm::Xxh3 | HashAlgorithm::Xxh64 | HashAlgorithm::Crc32
        )
    }
}

// =============================================================================
// Streaming Hasher - Unified interface for incremental hashing
// =============================================================================

/// A unified streaming hasher that supports all hash algorithms
///
/// Cloneable so a digest can be read without consuming the accumulator.
/// Blake3Hasher is boxed because it's ~1920 bytes, while other variants are ~20-600 bytes
#[derive(Clone)]
pub enum StreamingHasher {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    #[cfg(feature = "sha3")]
    Sha3_256(Sha3_256),
    #[cfg(feature = "sha3")]
    Sha3_512(Sha3_512),
    Blake2(Blake2b512),
    Blake3(Box<Blake3Hasher>),
    Xxh3(Box<Xxh3>),
    Xxh64(Xxh64),
    Crc32(Crc32Hasher),
}

impl StreamingHasher {
    /// Create a new streaming hasher for the specified algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => StreamingHasher::Md5(Md5::new()),
            HashAlgorithm::Sha1 => StreamingHasher::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => StreamingHasher::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => StreamingHasher::Sha512(Sha512::new()),
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_256 => StreamingHasher::Sha3_256(Sha3_256::new()),
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_512 => StreamingHasher::Sha3_512(Sha3_512::new()),
            HashAlgorithm::Blake2 => StreamingHasher::Blake2(Blake2b512::new()),
            HashAlgorithm::Blake3 => StreamingHasher::Blake3(Box::new(Blake3Hasher::new())),
            HashAlgorithm::Xxh3 => StreamingHasher::Xxh3(Box::new(Xxh3::new())),
            HashAlgorithm::Xxh64 => StreamingHasher::Xxh64(Xxh64::new(0)),
            HashAlgorithm::Crc32 => StreamingHasher::Crc32(Crc32Hasher::new()),
        }
    }

    /// Update the hash with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            StreamingHasher::Md5(h) => Digest::update(h, data),
            StreamingHasher::Sha1(h) => Digest::update(h, data),
            StreamingHasher::Sha256(h) => Digest::update(h, data),
            StreamingHasher::Sha512(h) => Digest::update(h, data),
            #[cfg(feature = "sha3")]
            StreamingHasher::Sha3_256(h) => Digest::update(h, data),
            #[cfg(feature = "sha3")]
            StreamingHasher::Sha3_512(h) => Digest::update(h, data),
            StreamingHasher::Blake2(h) => Digest::update(h, data),
            StreamingHasher::Blake3(h) => {
                h.update(data);
            }
            StreamingHasher::Xxh3(h) => h.update(data),
            StreamingHasher::Xxh64(h) => h.update(data),
            StreamingHasher::Crc32(h) => h.update(data),
        }
    }

    /// Finalize and return the hash as a lower-case hex string
    pub fn finalize(self) -> String {
        match self {
            StreamingHasher::Md5(h) => hex::encode(h.finalize()),
            StreamingHasher::Sha1(h) => hex::encode(h.finalize()),
            StreamingHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamingHasher::Sha512(h) => hex::encode(h.finalize()),
            #[cfg(feature = "sha3")]
            StreamingHasher::Sha3_256(h) => hex::encode(h.finalize()),
            #[cfg(feature = "sha3")]
            StreamingHasher::Sha3_512(h) => hex::encode(h.finalize()),
            StreamingHasher::Blake2(h) => hex::encode(h.finalize()),
            StreamingHasher::Blake3(h) => h.finalize().to_hex().to_string(),
            StreamingHasher::Xxh3(h) => format!("{:032x}", h.digest128()),
            StreamingHasher::Xxh64(h) => format!("{:016x}", h.digest()),
            StreamingHasher::Crc32(h) => format!("{:08x}", h.finalize()),
        }
    }
}

/// Compute hash of data using specified algorithm (one-shot, for small data)
pub fn compute_hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    let mut hasher = StreamingHasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}
