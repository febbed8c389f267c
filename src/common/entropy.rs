//! Entropy analysis utilities
//!
//! Shannon entropy over byte-value frequencies, in bits per byte (0.0 - 8.0).
//! Useful in forensic triage to spot encrypted volumes, compressed data or
//! wiped areas.
//!
//! - 0.0 = All bytes identical (e.g., all zeros)
//! - ~4.5 = English text
//! - ~7.5 = Compressed data
//! - ~7.9+ = Encrypted or truly random data

// =============================================================================
// Byte Histogram
// =============================================================================

/// Incremental byte-value histogram
///
/// Counts are additive, so feeding data in any number of chunks yields the
/// same histogram as feeding it at once.
#[derive(Clone, Debug)]
pub struct ByteHistogram {
    counts: [u64; 256],
    total: u64,
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteHistogram {
    pub fn new() -> Self {
        Self {
            counts: [0u64; 256],
            total: 0,
        }
    }

    /// Count every byte in `data`
    pub fn add(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    /// Total number of bytes counted
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occurrences of a single byte value
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Shannon entropy of the counted bytes
    ///
    /// An empty histogram has no terms, so its entropy is exactly 0.0.
    pub fn entropy(&self) -> f64 {
        let len = self.total as f64;
        let mut entropy = 0.0;

        for &count in &self.counts {
            if count > 0 {
                let probability = count as f64 / len;
                entropy -= probability * probability.log2();
            }
        }

        entropy
    }
}

/// Calculate Shannon entropy of data (0.0 - 8.0 bits per byte)
pub fn calculate_entropy(data: &[u8]) -> f64 {
    let mut histogram = ByteHistogram::new();
    histogram.add(data);
    histogram.entropy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_zeros() {
        let data = vec![0u8; 1000];
        assert_eq!(calculate_entropy(&data), 0.0);
    }

    #[test]
    fn test_entropy_full_range() {
        let data: Vec<u8> = (0..=255u8).collect();
        assert!((calculate_entropy(&data) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_text() {
        let entropy = calculate_entropy(b"The quick brown fox jumps over the lazy dog");
        assert!(entropy > 3.0 && entropy < 5.0);
    }

    #[test]
    fn test_empty_data() {
        let histogram = ByteHistogram::new();
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.entropy(), 0.0);
    }

    #[test]
    fn test_histogram_chunked() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let mut chunked = ByteHistogram::new();
        for chunk in data.chunks(13) {
            chunked.add(chunk);
        }
        assert_eq!(chunked.total(), 4096);
        assert_eq!(chunked.count(0), data.iter().filter(|&&b| b == 0).count() as u64);
        assert_eq!(chunked.entropy(), calculate_entropy(&data));
    }
}
