//! EWF (Expert Witness Format) forensic image reading
//!
//! Decodes the acquired medium stored in an EnCase E01 segment set so it can be
//! digested like any other byte stream.
//!
//! ## Format Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ EVF Signature (8 bytes) + segment number (13 byte header)    │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Section Chain (linked list of 76-byte descriptors)           │
//! │  volume/disk: chunk count, sectors per chunk, sector size    │
//! │  sectors: chunk data (zlib compressed or stored)             │
//! │  table: chunk offsets, MSB set = compressed                  │
//! │  next: continue in the following segment file                │
//! │  done: end of the set                                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Large media span several files: `image.E01`, `image.E02`, ... Only the
//! primary segment names a set; see [`format_supported`] and [`list_segments`].

mod handle;
mod types;

#[cfg(test)]
pub(crate) mod fixture;

use std::path::{Path, PathBuf};

pub use handle::EwfImage;
pub use types::VolumeSection;

pub use crate::common::segments::{describe_segments, format_supported};

/// Resolve a segment path to the ordered list of files in its set
pub fn list_segments(path: &Path) -> Vec<PathBuf> {
    crate::common::segments::discover_ewf_segments(path)
}
