//! SimpleVM Core
//!
//! A simulated virtual memory subsystem: fixed-size pages loaded lazily from a
//! flat swap file, held in a bounded LRU page table, and written back when
//! dirty on flush, eviction or drop.

pub mod error;
pub mod vm;

pub use error::{Error, Result};
pub use vm::{Page, PageTable, PageTableConfig, PageTableStats, SwapFile, PAGE_SIZE};
