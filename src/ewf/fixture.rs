//! Synthetic EWF v1 segment sets for tests

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::types::{COMPRESSED_FLAG, EWF_SIGNATURE, SECTION_DESCRIPTOR_SIZE};

const BYTES_PER_SECTOR: usize = 512;
const VOLUME_DATA_SIZE: usize = 94;

#[derive(Clone, Copy, Debug)]
pub(crate) struct ImageLayout {
    pub sectors_per_chunk: u32,
    pub chunks_per_segment: usize,
    pub compress: bool,
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            sectors_per_chunk: 8,
            chunks_per_segment: usize::MAX,
            compress: true,
        }
    }
}

fn push_section(out: &mut Vec<u8>, section_type: &str, data_len: usize, end_of_chain: bool) {
    let offset = out.len() as u64;
    let size = SECTION_DESCRIPTOR_SIZE + data_len as u64;
    let next = if end_of_chain { offset } else { offset + size };

    let mut name = [0u8; 16];
    name[..section_type.len()].copy_from_slice(section_type.as_bytes());
    out.extend_from_slice(&name);
    out.extend_from_slice(&next.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&[0u8; 40]);
    out.extend_from_slice(&[0u8; 4]);
}

/// Write `data` as an E01 set named `<stem>.E01`, `<stem>.E02`, ...
///
/// `data` must be a whole number of 512-byte sectors. Returns segment paths in order.
pub(crate) fn write_image(dir: &Path, stem: &str, data: &[u8], layout: ImageLayout) -> Vec<PathBuf> {
    assert_eq!(data.len() % BYTES_PER_SECTOR, 0, "fixture data must be sector aligned");

    let chunk_size = layout.sectors_per_chunk as usize * BYTES_PER_SECTOR;
    let chunks: Vec<&[u8]> = data.chunks(chunk_size).collect();
    let empty: &[&[u8]] = &[];
    let groups: Vec<&[&[u8]]> = if chunks.is_empty() {
        vec![empty]
    } else {
        chunks.chunks(layout.chunks_per_segment.max(1)).collect()
    };

    let mut paths = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        let segment_number = index + 1;
        let last = segment_number == groups.len();
        let mut out = Vec::new();

        out.extend_from_slice(EWF_SIGNATURE);
        out.push(1);
        out.extend_from_slice(&(segment_number as u16).to_le_bytes());
        out.extend_from_slice(&[0u8; 2]);

        if segment_number == 1 {
            push_section(&mut out, "volume", VOLUME_DATA_SIZE, false);
            let mut volume = Vec::with_capacity(VOLUME_DATA_SIZE);
            volume.extend_from_slice(&1u32.to_le_bytes());
            volume.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
            volume.extend_from_slice(&layout.sectors_per_chunk.to_le_bytes());
            volume.extend_from_slice(&(BYTES_PER_SECTOR as u32).to_le_bytes());
            volume.extend_from_slice(&((data.len() / BYTES_PER_SECTOR) as u64).to_le_bytes());
            volume.resize(VOLUME_DATA_SIZE, 0);
            out.extend_from_slice(&volume);
        }

        let sectors_start = out.len() + SECTION_DESCRIPTOR_SIZE as usize;
        let mut body = Vec::new();
        let mut entries = Vec::new();
        for chunk in group.iter() {
            let offset = (sectors_start + body.len()) as u32;
            if layout.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(chunk).unwrap();
                body.extend_from_slice(&encoder.finish().unwrap());
                entries.push(offset | COMPRESSED_FLAG);
            } else {
                body.extend_from_slice(chunk);
                entries.push(offset);
            }
        }
        push_section(&mut out, "sectors", body.len(), false);
        out.extend_from_slice(&body);

        push_section(&mut out, "table", 24 + entries.len() * 4 + 4, false);
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&0u64.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]);
        for entry in &entries {
            out.extend_from_slice(&entry.to_le_bytes());
        }
        out.extend_from_slice(&[0u8; 4]);

        push_section(&mut out, if last { "done" } else { "next" }, 0, true);

        let path = dir.join(format!("{}.E{:02}", stem, segment_number));
        std::fs::write(&path, &out).unwrap();
        paths.push(path);
    }

    paths
}
