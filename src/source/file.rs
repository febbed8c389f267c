//! Local file source

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::common::binary::read_full;
use crate::error::{DigestError, Result};

use super::Source;

/// Plain binary file read front to back
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    id: String,
    file: Option<File>,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let id = path.display().to_string();
        Self {
            path,
            id,
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Ok(());
        }
        if self.path.is_dir() {
            return Err(DigestError::open(&self.id, "is a directory"));
        }
        let file = File::open(&self.path).map_err(|e| DigestError::open(&self.id, e))?;
        self.file = Some(file);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// On-disk size; known without opening
    fn length(&self) -> Result<u64> {
        fs::metadata(&self.path)
            .map(|meta| meta.len())
            .map_err(|e| DigestError::open(&self.id, e))
    }

    fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let file = self.file.as_mut().ok_or_else(|| DigestError::SourceClosed {
            source_id: self.id.clone(),
        })?;
        read_full(file, buffer).map_err(|e| DigestError::read(&self.id, e))
    }

    fn close(&mut self) {
        self.file = None;
    }
}
