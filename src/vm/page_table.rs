//! Page table with LRU eviction
//! Keeps a bounded set of pages loaded from the swap file

use crate::error::Result;
use ahash::AHashMap;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, trace};

use super::address::AddressLayout;
use super::page::Page;
use super::swap::SwapFile;
use super::types::{PageNumber, PageTableConfig, VirtualAddress};
use super::value::PageValue;

/// Bounded cache of loaded pages with least-recently-used replacement.
///
/// Only `get_page` (and the `read`/`write` helpers built on it) counts as a use.
/// Holding on to a returned page does not refresh it.
pub struct PageTable {
    swap: SwapFile,
    layout: AddressLayout,
    capacity: usize,
    sync_on_flush: bool,
    pages: AHashMap<PageNumber, Page>,
    // Least recently used at the front, most recently used at the back.
    recency: VecDeque<PageNumber>,
    stats: PageTableStats,
}

impl PageTable {
    /// Open `swap_file` (creating it if needed) with room for `capacity` pages.
    pub fn new(swap_file: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        Self::with_config(PageTableConfig::new(swap_file.as_ref(), capacity))
    }

    pub fn with_config(config: PageTableConfig) -> Result<Self> {
        config.validate()?;
        let swap = SwapFile::open(&config.swap_file, config.create_if_missing)?;
        debug!(
            "Opened page table on {} (capacity: {} pages)",
            config.swap_file.display(),
            config.capacity
        );
        Ok(Self::build(swap, &config))
    }

    /// Build a table over an already opened swap file. The path in `config` is ignored.
    pub fn from_swap(swap: SwapFile, config: &PageTableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(swap, config))
    }

    fn build(swap: SwapFile, config: &PageTableConfig) -> Self {
        PageTable {
            swap,
            layout: AddressLayout::new(config.address_bits),
            capacity: config.capacity,
            sync_on_flush: config.sync_on_flush,
            pages: AHashMap::with_capacity(config.capacity),
            recency: VecDeque::with_capacity(config.capacity),
            stats: PageTableStats::default(),
        }
    }

    /// Return the page holding `address`, loading it and evicting the least
    /// recently used page if the table is full. The page becomes the most
    /// recently used one.
    pub fn get_page(&mut self, address: VirtualAddress) -> Result<&mut Page> {
        let page_number = self.layout.page_number(address);

        if self.pages.contains_key(&page_number) {
            self.touch(page_number);
            self.stats.hits += 1;
            trace!("Page {} hit", page_number);
        } else if self.pages.len() >= self.capacity {
            self.evict_page()?;
        }

        let page = match self.pages.entry(page_number) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let page = Page::load(&self.swap, page_number)?
                    .with_sync_on_flush(self.sync_on_flush);
                self.recency.push_back(page_number);
                self.stats.misses += 1;
                self.stats.loads += 1;
                entry.insert(page)
            }
        };
        Ok(page)
    }

    /// Read a `T` at `address` through `get_page`.
    pub fn read<T: PageValue>(&mut self, address: VirtualAddress) -> Result<T> {
        Ok(self.get_page(address)?.read(address))
    }

    /// Write a `T` at `address` through `get_page`.
    pub fn write<T: PageValue>(&mut self, address: VirtualAddress, value: T) -> Result<()> {
        self.get_page(address)?.write(address, value);
        Ok(())
    }

    /// Look at a loaded page without counting it as a use.
    pub fn peek_page(&self, page_number: PageNumber) -> Option<&Page> {
        self.pages.get(&page_number)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn loaded_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page_available(&self, page_number: PageNumber) -> bool {
        self.pages.contains_key(&page_number)
    }

    pub fn dirty_pages(&self) -> usize {
        self.pages.values().filter(|p| p.is_dirty()).count()
    }

    /// Loaded page numbers from least to most recently used.
    pub fn lru_order(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.recency.iter().copied()
    }

    pub fn layout(&self) -> AddressLayout {
        self.layout
    }

    pub fn stats(&self) -> &PageTableStats {
        &self.stats
    }

    /// Flush every loaded page. Recency and residency are unchanged.
    pub fn flush_all_pages(&mut self) -> Result<()> {
        for page_number in self.recency.iter() {
            if let Some(page) = self.pages.get_mut(page_number) {
                flush_counted(page, &mut self.stats)?;
            }
        }
        Ok(())
    }

    /// Flush one page if it is loaded.
    pub fn flush_page(&mut self, page_number: PageNumber) -> Result<()> {
        if let Some(page) = self.pages.get_mut(&page_number) {
            flush_counted(page, &mut self.stats)?;
        }
        Ok(())
    }

    /// Flush and unload one page if it is loaded.
    pub fn discard_page(&mut self, page_number: PageNumber) -> Result<()> {
        let Some(page) = self.pages.get_mut(&page_number) else {
            return Ok(());
        };
        // Flush before unlinking so a failed write leaves the page resident.
        flush_counted(page, &mut self.stats)?;

        self.pages.remove(&page_number);
        if let Some(pos) = self.recency.iter().position(|&p| p == page_number) {
            self.recency.remove(pos);
        }
        trace!("Discarded page {}", page_number);
        Ok(())
    }

    /// Discard the least recently used page, if any.
    pub fn evict_page(&mut self) -> Result<()> {
        let Some(&victim) = self.recency.front() else {
            return Ok(());
        };
        debug!("Evicting page {}", victim);
        self.discard_page(victim)?;
        self.stats.evictions += 1;
        Ok(())
    }

    /// Flush every page and release the table, reporting any write-back failure.
    pub fn close(mut self) -> Result<()> {
        self.flush_all_pages()
    }

    fn touch(&mut self, page_number: PageNumber) {
        if let Some(pos) = self.recency.iter().position(|&p| p == page_number) {
            self.recency.remove(pos);
        }
        self.recency.push_back(page_number);
    }
}

impl Drop for PageTable {
    fn drop(&mut self) {
        // Pages that fail here log their own error when they drop.
        if let Err(e) = self.flush_all_pages() {
            debug!("Page table flush on drop stopped early: {}", e);
        }
        debug!(
            "Closing page table ({} pages loaded, {} evictions)",
            self.pages.len(),
            self.stats.evictions
        );
    }
}

fn flush_counted(page: &mut Page, stats: &mut PageTableStats) -> Result<()> {
    if page.is_dirty() {
        page.flush()?;
        stats.flushes += 1;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTableStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evictions: u64,
    /// Dirty pages written back to the swap file by the table.
    pub flushes: u64,
}

impl PageTableStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}
