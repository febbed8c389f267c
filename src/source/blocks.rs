//! Double-buffered block streaming
//!
//! Two buffers of `block_size` bytes are allocated once per pass. Block *i*
//! lives in buffer `i % 2`; while block *i* is borrowed by readers, block
//! *i + 1* is read into the other buffer through a [`Prefetch`]. The borrow
//! checker enforces the rotation: [`Blocks::split`] hands out the current
//! block and the prefetch handle together, and [`Blocks::rotate`] requires
//! both to be released first.

use crate::error::Result;

use super::Source;

/// Ordered, finite, non-restartable block stream over one source
pub struct Blocks<'s, S: Source + ?Sized> {
    source: &'s mut S,
    buffers: [Vec<u8>; 2],
    current: usize,
    filled: usize,
    primed: bool,
}

/// Byte count of a completed prefetch, consumed by [`Blocks::rotate`]
#[derive(Debug)]
#[must_use]
pub struct Filled(usize);

impl Filled {
    pub fn len(&self) -> usize {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Write access to the idle buffer while the current block is borrowed
pub struct Prefetch<'a, S: Source + ?Sized> {
    source: &'a mut S,
    buffer: &'a mut [u8],
}

impl<S: Source + ?Sized> Prefetch<'_, S> {
    /// Read the next block into the idle buffer
    pub fn read(self) -> Result<Filled> {
        let n = self.source.read_into(self.buffer)?;
        Ok(Filled(n))
    }
}

impl<'s, S: Source + ?Sized> Blocks<'s, S> {
    /// A zero `block_size` is clamped to one byte
    pub fn new(source: &'s mut S, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            source,
            buffers: [vec![0u8; block_size], vec![0u8; block_size]],
            current: 0,
            filled: 0,
            primed: false,
        }
    }

    pub fn block_size(&self) -> usize {
        self.buffers[0].len()
    }

    /// Read block 0 into the first buffer; returns its length
    pub fn prime(&mut self) -> Result<usize> {
        self.current = 0;
        self.filled = self.source.read_into(&mut self.buffers[0])?;
        self.primed = true;
        Ok(self.filled)
    }

    /// The current block, empty once the stream is exhausted
    pub fn current(&self) -> &[u8] {
        &self.buffers[self.current][..self.filled]
    }

    /// Borrow the current block alongside a handle that fills the other buffer
    pub fn split(&mut self) -> (&[u8], Prefetch<'_, S>) {
        let (first, second) = self.buffers.split_at_mut(1);
        let (current, idle) = if self.current == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };
        (
            &current[..self.filled],
            Prefetch {
                source: &mut *self.source,
                buffer: idle.as_mut_slice(),
            },
        )
    }

    /// Make the prefetched buffer current; returns the new block's length
    pub fn rotate(&mut self, filled: Filled) -> usize {
        self.current = 1 - self.current;
        self.filled = filled.0;
        self.filled
    }

    /// Sequential access for callers that do not overlap reads with work
    pub fn next_block(&mut self) -> Result<Option<&[u8]>> {
        if !self.primed {
            self.prime()?;
        } else if self.filled > 0 {
            let (_, prefetch) = self.split();
            let filled = prefetch.read()?;
            self.rotate(filled);
        }

        if self.filled == 0 {
            Ok(None)
        } else {
            Ok(Some(self.current()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::MemorySource;

    fn collect(source: &mut MemorySource, block_size: usize) -> Vec<Vec<u8>> {
        source.open().unwrap();
        let mut blocks = source.blocks(block_size);
        let mut out = Vec::new();
        while let Some(block) = blocks.next_block().unwrap() {
            out.push(block.to_vec());
        }
        out
    }

    #[test]
    fn test_block_lengths_sum_to_length() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        for block_size in [1, 7, 64, 999, 1000, 1001, 4096] {
            let mut source = MemorySource::new("mem", data.clone());
            let blocks = collect(&mut source, block_size);
            let total: usize = blocks.iter().map(Vec::len).sum();
            assert_eq!(total as u64, source.length().unwrap(), "block size {}", block_size);
            assert!(blocks.iter().all(|b| !b.is_empty() && b.len() <= block_size));
            assert_eq!(blocks.concat(), data);
        }
    }

    #[test]
    fn test_empty_source_yields_no_blocks() {
        let mut source = MemorySource::new("empty", Vec::new());
        assert!(collect(&mut source, 16).is_empty());
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn test_terminates_on_first_zero_read() {
        let mut source = MemorySource::new("mem", vec![9u8; 10]);
        let blocks = collect(&mut source, 4);
        assert_eq!(blocks.len(), 3);
        // 3 data reads plus the one that returned 0
        assert_eq!(source.reads(), 4);

        source.open().unwrap();
        let mut stream = source.blocks(4);
        while stream.next_block().unwrap().is_some() {}
        assert!(stream.next_block().unwrap().is_none());
    }

    #[test]
    fn test_short_reads_are_passed_through() {
        let mut source = MemorySource::new("mem", vec![1u8; 10]).with_max_read(3);
        let blocks = collect(&mut source, 8);
        let lengths: Vec<usize> = blocks.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_split_keeps_current_block_intact() {
        let data: Vec<u8> = (0u8..12).collect();
        let mut source = MemorySource::new("mem", data);
        source.open().unwrap();
        let mut blocks = source.blocks(4);

        assert_eq!(blocks.prime().unwrap(), 4);
        let (current, prefetch) = blocks.split();
        let before = current.to_vec();
        let filled = prefetch.read().unwrap();
        assert_eq!(current, before.as_slice());
        assert_eq!(current, &[0, 1, 2, 3]);
        assert_eq!(filled.len(), 4);

        blocks.rotate(filled);
        assert_eq!(blocks.current(), &[4, 5, 6, 7]);

        let (current, prefetch) = blocks.split();
        let filled = prefetch.read().unwrap();
        assert_eq!(current, &[4, 5, 6, 7]);
        blocks.rotate(filled);
        assert_eq!(blocks.current(), &[8, 9, 10, 11]);
    }

    #[test]
    fn test_read_error_surfaces() {
        let mut source = MemorySource::new("mem", vec![0u8; 20]).failing_on_read(2);
        source.open().unwrap();
        let mut blocks = source.blocks(5);
        assert!(blocks.next_block().unwrap().is_some());
        assert!(blocks.next_block().is_err());
    }

    #[test]
    fn test_zero_block_size_is_clamped() {
        let mut source = MemorySource::new("mem", vec![0u8; 3]);
        let blocks = source.blocks(0);
        assert_eq!(blocks.block_size(), 1);
    }
}
