//! Forensic image source over an EWF segment set

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DigestError, Result};
use crate::ewf::{self, EwfImage};

use super::Source;

/// Decoded medium of an E01/L01/S01 image
///
/// The primary segment names the set; siblings are resolved at construction
/// and opened together. The length is the acquired media size, which is only
/// known once the volume section has been read.
pub struct EwfSource {
    segments: Vec<PathBuf>,
    id: String,
    image: Option<EwfImage>,
}

impl EwfSource {
    pub fn new(primary: impl AsRef<Path>) -> Self {
        let segments = ewf::list_segments(primary.as_ref());
        let id = ewf::describe_segments(&segments);
        Self {
            segments,
            id,
            image: None,
        }
    }

    pub fn segments(&self) -> &[PathBuf] {
        &self.segments
    }
}

impl Source for EwfSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&mut self) -> Result<()> {
        if self.image.is_some() {
            return Ok(());
        }
        let image =
            EwfImage::open(self.segments.clone()).map_err(|reason| DigestError::open(&self.id, reason))?;
        debug!(
            source = %self.id,
            segments = image.segment_count(),
            media_size = image.media_size(),
            "EWF source opened"
        );
        self.image = Some(image);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.image.is_some()
    }

    fn length(&self) -> Result<u64> {
        self.image
            .as_ref()
            .map(EwfImage::media_size)
            .ok_or_else(|| DigestError::SourceClosed {
                source_id: self.id.clone(),
            })
    }

    fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let image = self.image.as_mut().ok_or_else(|| DigestError::SourceClosed {
            source_id: self.id.clone(),
        })?;
        image.read(buffer).map_err(|e| DigestError::read(&self.id, e))
    }

    fn close(&mut self) {
        if let Some(mut image) = self.image.take() {
            image.close();
        }
    }
}
