//! Shared handle to the swap file
//!
//! The swap file is a flat run of PAGE_SIZE regions, region `n` at byte
//! offset `n * PAGE_SIZE`. No header, no checksum.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use super::page::PAGE_SIZE;
use super::types::PageNumber;

/// Cloning a `SwapFile` shares the handle; it is closed when the last clone drops.
#[derive(Debug, Clone)]
pub struct SwapFile {
    file: Arc<Mutex<File>>,
}

impl SwapFile {
    pub fn open(path: impl AsRef<Path>, create: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(create)
            .open(path)
            .map_err(|e| {
                Error::SwapFileError(format!("Failed to open {}: {}", path.display(), e))
            })?;
        Ok(Self::from_file(file))
    }

    /// Adopt an already opened handle. It must allow both reads and writes.
    pub fn from_file(file: File) -> Self {
        SwapFile {
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// Fill `buf` with the region for `page_number`. Bytes past end of file read as zero.
    pub fn read_page(&self, page_number: PageNumber, buf: &mut [u8; PAGE_SIZE]) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(page_offset(page_number)))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        buf[filled..].fill(0);
        Ok(())
    }

    pub fn write_page(
        &self,
        page_number: PageNumber,
        buf: &[u8; PAGE_SIZE],
        sync: bool,
    ) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(page_offset(page_number)))?;
        file.write_all(buf)?;
        if sync {
            file.sync_data()?;
        }
        Ok(())
    }

    pub fn len(&self) -> Result<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of live handles, this one included.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.file)
    }
}

fn page_offset(page_number: PageNumber) -> u64 {
    page_number as u64 * PAGE_SIZE as u64
}
