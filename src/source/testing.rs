//! In-memory sources for tests

use std::io;

use crate::error::{DigestError, Result};

use super::Source;

/// Serves `data` from memory, optionally failing or handing out short reads
pub(crate) struct MemorySource {
    id: String,
    data: Vec<u8>,
    position: usize,
    open: bool,
    reads: usize,
    /// 1-based read call that fails with an I/O error
    pub fail_on_read: Option<usize>,
    /// Upper bound on bytes returned per read
    pub max_read: Option<usize>,
    pub close_count: usize,
}

impl MemorySource {
    pub fn new(id: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.to_string(),
            data: data.into(),
            position: 0,
            open: false,
            reads: 0,
            fail_on_read: None,
            max_read: None,
            close_count: 0,
        }
    }

    pub fn failing_on_read(mut self, read: usize) -> Self {
        self.fail_on_read = Some(read);
        self
    }

    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read);
        self
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Source for MemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&mut self) -> Result<()> {
        self.open = true;
        self.position = 0;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn length(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if !self.open {
            return Err(DigestError::SourceClosed {
                source_id: self.id.clone(),
            });
        }
        self.reads += 1;
        if self.fail_on_read == Some(self.reads) {
            return Err(DigestError::read(
                &self.id,
                io::Error::new(io::ErrorKind::Other, "simulated read failure"),
            ));
        }

        let remaining = &self.data[self.position..];
        let limit = self.max_read.unwrap_or(usize::MAX);
        let n = remaining.len().min(buffer.len()).min(limit);
        buffer[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.close_count += 1;
        }
    }
}
