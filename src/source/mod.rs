//! Byte sources
//!
//! A [`Source`] is an openable, lengthed, readable byte stream: a plain file
//! ([`FileSource`]) or the decoded medium of a forensic image ([`EwfSource`]).
//! [`OpenSource`] scopes a source's handle so it is released on every exit
//! path, and [`Blocks`] streams it through two rotating buffers.

mod blocks;
mod ewf;
mod file;

#[cfg(test)]
pub(crate) mod testing;

pub use blocks::{Blocks, Filled, Prefetch};
pub use ewf::EwfSource;
pub use file::FileSource;

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Capability set shared by every byte source
pub trait Source {
    /// Identifier used in logs and reports
    fn id(&self) -> &str;

    /// Acquire the underlying handle
    fn open(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Total length of the logical stream in bytes
    fn length(&self) -> Result<u64>;

    /// Fill `buffer` from the current position; 0 means end of stream
    fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Release the handle; calling it on a closed source does nothing
    fn close(&mut self);

    /// Stream this source in blocks of at most `block_size` bytes
    fn blocks(&mut self, block_size: usize) -> Blocks<'_, Self>
    where
        Self: Sized,
    {
        Blocks::new(self, block_size)
    }
}

/// Pick the source variant for a path: EWF primaries decode as images
pub fn for_path(path: &Path) -> Box<dyn Source> {
    let is_image = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(crate::ewf::format_supported);

    if is_image {
        Box::new(EwfSource::new(path))
    } else {
        Box::new(FileSource::new(path))
    }
}

// =============================================================================
// Scoped acquisition
// =============================================================================

/// An open source that is closed when dropped
pub struct OpenSource<'a, S: Source + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: Source + ?Sized> OpenSource<'a, S> {
    pub fn open(source: &'a mut S) -> Result<Self> {
        source.open()?;
        debug!(source = source.id(), "Source opened");
        Ok(Self { source })
    }
}

impl<S: Source + ?Sized> Deref for OpenSource<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: Source + ?Sized> DerefMut for OpenSource<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: Source + ?Sized> Drop for OpenSource<'_, S> {
    fn drop(&mut self) {
        self.source.close();
        debug!(source = self.source.id(), "Source closed");
    }
}
