// Page Management
use crate::error::Result;
use tracing::{error, trace};

use super::address::page_offset;
use super::swap::SwapFile;
use super::types::{PageNumber, VirtualAddress};
use super::value::PageValue;

pub const PAGE_SIZE: usize = 4096;

/// One PAGE_SIZE window of the virtual address space, loaded from the swap file.
///
/// A loaded page owns its bytes but only shares the swap file handle. Dropping a
/// dirty page writes it back. `clone` yields an independent copy of the bytes that
/// keeps the page number, the swap file and the dirty flag.
#[derive(Debug, Clone)]
pub struct Page {
    page_number: PageNumber,
    bytes: Box<[u8; PAGE_SIZE]>,
    dirty: bool,
    swap: SwapFile,
    sync_on_flush: bool,
}

impl Page {
    /// Read the region for `page_number` out of the swap file.
    pub fn load(swap: &SwapFile, page_number: PageNumber) -> Result<Self> {
        let mut bytes = Box::new([0u8; PAGE_SIZE]);
        swap.read_page(page_number, &mut bytes)?;
        trace!("Loaded page {}", page_number);

        Ok(Page {
            page_number,
            bytes,
            dirty: false,
            swap: swap.clone(),
            sync_on_flush: false,
        })
    }

    pub fn with_sync_on_flush(mut self, sync: bool) -> Self {
        self.sync_on_flush = sync;
        self
    }

    pub fn page_number(&self) -> PageNumber {
        self.page_number
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.bytes
    }

    /// Read a `T` at the in-page offset of `address`.
    ///
    /// # Panics
    ///
    /// If the value would run past the end of the page.
    pub fn read<T: PageValue>(&self, address: VirtualAddress) -> T {
        let offset = self.span(address, T::SIZE);
        T::read_from(&self.bytes[offset..offset + T::SIZE])
    }

    /// Write a `T` at the in-page offset of `address` and mark the page dirty,
    /// even if the bytes did not change.
    ///
    /// # Panics
    ///
    /// If the value would run past the end of the page.
    pub fn write<T: PageValue>(&mut self, address: VirtualAddress, value: T) {
        let offset = self.span(address, T::SIZE);
        value.write_to(&mut self.bytes[offset..offset + T::SIZE]);
        self.dirty = true;
    }

    pub fn read_bytes(&self, address: VirtualAddress, buf: &mut [u8]) {
        let offset = self.span(address, buf.len());
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
    }

    pub fn write_bytes(&mut self, address: VirtualAddress, data: &[u8]) {
        let offset = self.span(address, data.len());
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        self.dirty = true;
    }

    /// Write the page back if dirty. A clean page does no I/O.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.swap
            .write_page(self.page_number, &self.bytes, self.sync_on_flush)?;
        self.dirty = false;
        trace!("Flushed page {}", self.page_number);
        Ok(())
    }

    fn span(&self, address: VirtualAddress, len: usize) -> usize {
        let offset = page_offset(address);
        assert!(
            offset + len <= PAGE_SIZE,
            "access of {} bytes at offset {:#x} crosses the end of page {}",
            len,
            offset,
            self.page_number
        );
        offset
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!("Failed to flush page {} on drop: {}", self.page_number, e);
        }
    }
}
