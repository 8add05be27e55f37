// Virtual Memory Module
// Swap file backed pages and the LRU page table over them

pub mod address;
pub mod page;
pub mod page_table;
pub mod swap;
pub mod types;
pub mod value;

pub use address::*;
pub use page::*;
pub use page_table::*;
pub use swap::*;
pub use types::*;
pub use value::*;
