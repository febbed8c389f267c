//! Type definitions for EWF format parsing

// =============================================================================
// Core Constants
// =============================================================================

pub(crate) const EWF_SIGNATURE: &[u8; 8] = b"EVF\x09\x0d\x0a\xff\x00";
pub(crate) const LVF_SIGNATURE: &[u8; 8] = b"LVF\x09\x0d\x0a\xff\x00";
pub(crate) const EWF2_SIGNATURE: &[u8; 8] = b"EVF2\x0d\x0a\x81\x00";
/// Signature, fields start, segment number, fields end
pub(crate) const FILE_HEADER_SIZE: u64 = 13;
/// Type, next offset, size, padding, checksum
pub(crate) const SECTION_DESCRIPTOR_SIZE: u64 = 76;
/// Entry count, padding, base offset, padding, checksum
pub(crate) const TABLE_HEADER_SIZE: u64 = 24;
pub(crate) const COMPRESSED_FLAG: u32 = 0x8000_0000;
pub(crate) const MAX_OPEN_FILES: usize = 16; // Like libewf's rlimit handling
pub(crate) const MAX_SECTIONS: u32 = 10_000;
/// Upper bound on a decoded chunk
pub(crate) const MAX_CHUNK_SIZE: u64 = 64 << 20;

// =============================================================================
// Section Descriptors - EWF Format Structures
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct SectionDescriptor {
    pub section_type: String,
    /// Offset of the next descriptor within the same segment file
    pub next_offset: u64,
    /// Size including this descriptor
    pub size: u64,
}

/// Media geometry from the `volume`/`disk` section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeSection {
    pub chunk_count: u32,
    pub sectors_per_chunk: u32,
    pub bytes_per_sector: u32,
    pub sector_count: u64,
}

impl VolumeSection {
    pub fn chunk_size(&self) -> u64 {
        self.sectors_per_chunk as u64 * self.bytes_per_sector as u64
    }

    /// Size of the original acquired medium, `None` when it does not fit in a u64
    pub fn media_size(&self) -> Option<u64> {
        self.sector_count.checked_mul(self.bytes_per_sector as u64)
    }
}

// =============================================================================
// Chunk Location - Maps chunks to their storage location
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct ChunkLocation {
    pub segment_index: usize,
    /// Offset of the chunk data within its segment file
    pub offset: u64,
    pub compressed: bool,
}
