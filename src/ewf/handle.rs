//! EwfImage - sequential media reader over an EWF v1 segment set (like libewf_handle)

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use flate2::read::ZlibDecoder;
use tracing::{debug, trace};

use crate::common::binary::{le_u32, le_u64, read_u32_le, read_u64_le};
use crate::common::io_pool::FileIoPool;

use super::types::*;

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

pub struct EwfImage {
    /// File I/O pool managing all segment files
    file_pool: FileIoPool,
    /// Volume information from the first volume/disk section
    volume: VolumeSection,
    /// Decoded medium size, validated at open
    media_size: u64,
    /// Global chunk table, chunk_index -> storage location
    chunk_table: Vec<ChunkLocation>,
    /// Read position in the decoded media stream
    position: u64,
    /// Most recently decoded chunk
    current_chunk: Option<(usize, Vec<u8>)>,
}

impl EwfImage {
    /// Open an ordered segment set (like libewf_handle_open)
    ///
    /// Fails when a segment lacks the EWF signature, no volume section exists,
    /// or the chunk tables of the set do not cover the whole medium.
    pub fn open(segment_paths: Vec<PathBuf>) -> Result<Self, String> {
        if segment_paths.is_empty() {
            return Err("no segment files".to_string());
        }

        let mut file_pool = FileIoPool::new(segment_paths, MAX_OPEN_FILES);
        let (volume, mut chunk_table) = Self::parse_segments(&mut file_pool)?;
        let volume = volume.ok_or("no volume section found")?;

        let chunk_size = volume.chunk_size();
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "invalid volume geometry: {} sectors per chunk of {} bytes",
                volume.sectors_per_chunk, volume.bytes_per_sector
            ));
        }
        let media_size = volume.media_size().ok_or_else(|| {
            format!(
                "invalid volume geometry: {} sectors of {} bytes",
                volume.sector_count, volume.bytes_per_sector
            )
        })?;

        let expected_chunks = usize::try_from(media_size.div_ceil(chunk_size))
            .map_err(|_| format!("invalid volume geometry: media size {} too large", media_size))?;
        if chunk_table.len() < expected_chunks {
            return Err(format!(
                "incomplete segment set: {} of {} chunks present in {} segment(s)",
                chunk_table.len(),
                expected_chunks,
                file_pool.get_file_count()
            ));
        }
        chunk_table.truncate(expected_chunks);

        debug!(
            segments = file_pool.get_file_count(),
            chunks = expected_chunks,
            media_size,
            "EWF image opened"
        );

        Ok(Self {
            file_pool,
            volume,
            media_size,
            chunk_table,
            position: 0,
            current_chunk: None,
        })
    }

    /// Walk the section chain of every segment, collecting volume and chunk tables
    fn parse_segments(
        file_pool: &mut FileIoPool,
    ) -> Result<(Option<VolumeSection>, Vec<ChunkLocation>), String> {
        let mut volume: Option<VolumeSection> = None;
        let mut chunk_table = Vec::new();

        for segment_index in 0..file_pool.get_file_count() {
            let segment_number = segment_index + 1;
            let file = file_pool
                .get_file(segment_index)
                .map_err(|e| format!("failed to open segment {}: {}", segment_number, e))?;
            let file_size = file
                .metadata()
                .map_err(|e| format!("failed to stat segment {}: {}", segment_number, e))?
                .len();

            Self::check_signature(file)
                .map_err(|e| format!("segment {}: {}", segment_number, e))?;

            let mut offset = FILE_HEADER_SIZE;
            let mut section_count = 0;

            loop {
                section_count += 1;
                if section_count > MAX_SECTIONS {
                    return Err(format!("segment {}: too many sections", segment_number));
                }
                if offset + SECTION_DESCRIPTOR_SIZE > file_size {
                    return Err(format!(
                        "segment {} truncated: no section descriptor at offset {}",
                        segment_number, offset
                    ));
                }

                let section = Self::read_section_descriptor(file, offset)
                    .map_err(|e| format!("segment {}: bad section at {}: {}", segment_number, offset, e))?;
                trace!(
                    segment = segment_number,
                    offset,
                    section = %section.section_type,
                    size = section.size,
                    "Section"
                );

                let data_offset = offset + SECTION_DESCRIPTOR_SIZE;
                match section.section_type.as_str() {
                    "volume" | "disk" => {
                        if volume.is_none() {
                            volume = Some(
                                Self::read_volume_section(file, data_offset)
                                    .map_err(|e| format!("segment {}: bad volume section: {}", segment_number, e))?,
                            );
                        }
                    }
                    "table" => {
                        let entries = Self::read_table_section(file, data_offset, section.size, file_size)
                            .map_err(|e| format!("segment {}: bad table section: {}", segment_number, e))?;
                        trace!(segment = segment_number, entries = entries.len(), "Chunk table");
                        chunk_table.extend(entries.into_iter().map(|(offset, compressed)| ChunkLocation {
                            segment_index,
                            offset,
                            compressed,
                        }));
                    }
                    // table2 mirrors table; the remaining sections carry no media data
                    "next" | "done" => break,
                    _ => {}
                }

                if section.next_offset <= offset {
                    trace!(segment = segment_number, "Section chain ended");
                    break;
                }
                offset = section.next_offset;
            }
        }

        Ok((volume, chunk_table))
    }

    fn check_signature(file: &mut File) -> io::Result<()> {
        file.seek(SeekFrom::Start(0))?;
        let mut signature = [0u8; 8];
        file.read_exact(&mut signature)?;

        if &signature == EWF_SIGNATURE || &signature == LVF_SIGNATURE {
            Ok(())
        } else if &signature == EWF2_SIGNATURE {
            Err(invalid_data("EWF2 (Ex01) segments are not supported".to_string()))
        } else {
            Err(invalid_data(format!("not an EWF segment (signature {:02x?})", signature)))
        }
    }

    fn read_section_descriptor(file: &mut File, offset: u64) -> io::Result<SectionDescriptor> {
        file.seek(SeekFrom::Start(offset))?;

        let mut section_type = [0u8; 16];
        file.read_exact(&mut section_type)?;
        let next_offset = read_u64_le(file)?;
        let size = read_u64_le(file)?;

        Ok(SectionDescriptor {
            section_type: String::from_utf8_lossy(&section_type)
                .trim_matches('\0')
                .to_string(),
            next_offset,
            size,
        })
    }

    fn read_volume_section(file: &mut File, offset: u64) -> io::Result<VolumeSection> {
        file.seek(SeekFrom::Start(offset))?;

        let _media_and_padding = read_u32_le(file)?;
        let chunk_count = read_u32_le(file)?;
        let sectors_per_chunk = read_u32_le(file)?;
        let bytes_per_sector = read_u32_le(file)?;
        let sector_count = read_u64_le(file)?;

        trace!(chunk_count, sectors_per_chunk, bytes_per_sector, sector_count, "Volume");

        Ok(VolumeSection {
            chunk_count,
            sectors_per_chunk,
            bytes_per_sector,
            sector_count,
        })
    }

    /// Read a table section into (segment-local offset, compressed) pairs
    ///
    /// The entry count is bounded by both the declared section size and the
    /// bytes left in the segment file.
    fn read_table_section(
        file: &mut File,
        offset: u64,
        size: u64,
        file_size: u64,
    ) -> io::Result<Vec<(u64, bool)>> {
        file.seek(SeekFrom::Start(offset))?;

        let mut header = [0u8; TABLE_HEADER_SIZE as usize];
        file.read_exact(&mut header)?;
        let entry_count = le_u32(&header, 0).unwrap_or(0) as u64;
        let base_offset = le_u64(&header, 8).unwrap_or(0);

        let declared = size.saturating_sub(SECTION_DESCRIPTOR_SIZE + TABLE_HEADER_SIZE);
        let remaining = file_size.saturating_sub(offset.saturating_add(TABLE_HEADER_SIZE));
        let room = declared.min(remaining) / 4;
        let entry_count = if entry_count > 0 { entry_count } else { room.saturating_sub(1) };
        if entry_count > room {
            return Err(invalid_data(format!(
                "table declares {} entries but section holds at most {}",
                entry_count, room
            )));
        }

        let mut raw = vec![0u8; entry_count as usize * 4];
        file.read_exact(&mut raw)?;

        raw.chunks_exact(4)
            .map(|entry| {
                let value = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]);
                let compressed = value & COMPRESSED_FLAG != 0;
                base_offset
                    .checked_add((value & !COMPRESSED_FLAG) as u64)
                    .map(|chunk_offset| (chunk_offset, compressed))
                    .ok_or_else(|| invalid_data(format!("chunk offset overflows base {}", base_offset)))
            })
            .collect()
    }

    /// Decode a chunk by index (like libewf_handle_read_buffer for one chunk)
    pub fn read_chunk(&mut self, chunk_index: usize) -> io::Result<Vec<u8>> {
        let location = self
            .chunk_table
            .get(chunk_index)
            .cloned()
            .ok_or_else(|| invalid_data(format!("chunk {} beyond chunk table", chunk_index)))?;

        let chunk_size = self.volume.chunk_size();
        let chunk_start = chunk_index as u64 * chunk_size;
        let expected = chunk_size.min(self.media_size.saturating_sub(chunk_start)) as usize;

        let file = self.file_pool.get_file(location.segment_index)?;
        file.seek(SeekFrom::Start(location.offset))?;

        let mut data = if location.compressed {
            let mut decoder = ZlibDecoder::new(file.take(chunk_size * 2));
            let mut decompressed = Vec::with_capacity(chunk_size as usize);
            decoder.read_to_end(&mut decompressed)?;
            decompressed
        } else {
            let mut stored = vec![0u8; expected];
            file.read_exact(&mut stored)?;
            stored
        };

        if data.len() < expected {
            return Err(invalid_data(format!(
                "chunk {} decoded to {} bytes, expected {}",
                chunk_index,
                data.len(),
                expected
            )));
        }
        data.truncate(expected);
        Ok(data)
    }

    /// Read decoded media from the current position, returning 0 at the end
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let media_size = self.media_size;
        let chunk_size = self.volume.chunk_size();
        let mut filled = 0;

        while filled < buf.len() && self.position < media_size {
            let chunk_index = (self.position / chunk_size) as usize;
            let within = (self.position % chunk_size) as usize;

            let cached = matches!(&self.current_chunk, Some((index, _)) if *index == chunk_index);
            if !cached {
                let data = self.read_chunk(chunk_index)?;
                self.current_chunk = Some((chunk_index, data));
            }

            let available = match &self.current_chunk {
                Some((_, data)) => data.get(within..).unwrap_or_default(),
                None => break,
            };
            let count = available.len().min(buf.len() - filled);
            if count == 0 {
                break;
            }

            buf[filled..filled + count].copy_from_slice(&available[..count]);
            filled += count;
            self.position += count as u64;
        }

        Ok(filled)
    }

    pub fn volume(&self) -> &VolumeSection {
        &self.volume
    }

    pub fn media_size(&self) -> u64 {
        self.media_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_table.len()
    }

    pub fn segment_count(&self) -> usize {
        self.file_pool.get_file_count()
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Release every segment handle
    pub fn close(&mut self) {
        self.current_chunk = None;
        self.file_pool.close_all();
    }
}
