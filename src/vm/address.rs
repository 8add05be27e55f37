//! Virtual address decomposition
//!
//! An address splits into a page number (high bits) and an in-page offset
//! (low `PAGE_SHIFT` bits). The address width is configurable; bits above it
//! are ignored.

use super::types::{PageNumber, VirtualAddress};

pub const PAGE_SHIFT: u32 = 12;
pub const OFFSET_MASK: VirtualAddress = (1 << PAGE_SHIFT) - 1;

/// Narrowest width that still leaves one page-number bit.
pub const MIN_ADDRESS_BITS: u32 = PAGE_SHIFT + 1;
pub const MAX_ADDRESS_BITS: u32 = VirtualAddress::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLayout {
    address_bits: u32,
    width_mask: VirtualAddress,
}

impl AddressLayout {
    /// Panics if `address_bits` is outside `MIN_ADDRESS_BITS..=MAX_ADDRESS_BITS`;
    /// `PageTableConfig::validate` checks this first.
    pub fn new(address_bits: u32) -> Self {
        assert!(
            (MIN_ADDRESS_BITS..=MAX_ADDRESS_BITS).contains(&address_bits),
            "address width {} out of range",
            address_bits
        );
        let width_mask = if address_bits == MAX_ADDRESS_BITS {
            VirtualAddress::MAX
        } else {
            (1 << address_bits) - 1
        };
        AddressLayout {
            address_bits,
            width_mask,
        }
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    pub fn page_number(&self, address: VirtualAddress) -> PageNumber {
        (address & self.width_mask & !OFFSET_MASK) >> PAGE_SHIFT
    }

    pub fn page_offset(&self, address: VirtualAddress) -> usize {
        page_offset(address)
    }

    /// First address of the given page.
    pub fn base_address(&self, page_number: PageNumber) -> VirtualAddress {
        (page_number << PAGE_SHIFT) & self.width_mask
    }

    pub fn max_page_number(&self) -> PageNumber {
        self.width_mask >> PAGE_SHIFT
    }
}

impl Default for AddressLayout {
    fn default() -> Self {
        AddressLayout::new(MAX_ADDRESS_BITS)
    }
}

pub fn page_offset(address: VirtualAddress) -> usize {
    (address & OFFSET_MASK) as usize
}
