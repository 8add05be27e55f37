// Virtual Memory Types
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::address::{MAX_ADDRESS_BITS, MIN_ADDRESS_BITS};

/// A byte address in the simulated address space.
pub type VirtualAddress = u32;

/// Index of one PAGE_SIZE region of the swap file.
pub type PageNumber = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageTableConfig {
    pub swap_file: PathBuf,
    /// Maximum number of pages held in memory at once.
    pub capacity: usize,
    pub create_if_missing: bool,
    /// Call `sync_data` after every page write-back.
    pub sync_on_flush: bool,
    /// Width of a virtual address; the low 12 bits are the page offset.
    pub address_bits: u32,
}

impl Default for PageTableConfig {
    fn default() -> Self {
        PageTableConfig {
            swap_file: PathBuf::from("./swap.bytes"),
            capacity: 16,
            create_if_missing: true,
            sync_on_flush: false,
            address_bits: MAX_ADDRESS_BITS,
        }
    }
}

impl PageTableConfig {
    pub fn new(swap_file: impl Into<PathBuf>, capacity: usize) -> Self {
        PageTableConfig {
            swap_file: swap_file.into(),
            capacity,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PageTableConfig = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid page table config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ConfigError(
                "capacity must hold at least one page".to_string(),
            ));
        }
        if !(MIN_ADDRESS_BITS..=MAX_ADDRESS_BITS).contains(&self.address_bits) {
            return Err(Error::ConfigError(format!(
                "address_bits must be in {}..={}, got {}",
                MIN_ADDRESS_BITS, MAX_ADDRESS_BITS, self.address_bits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PageTableConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.address_bits, 32);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PageTableConfig::new("swap.bytes", 0);
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            PageTableConfig::from_json(r#"{"swap_file": "/tmp/vm.swap", "capacity": 4}"#).unwrap();
        assert_eq!(config.swap_file, PathBuf::from("/tmp/vm.swap"));
        assert_eq!(config.capacity, 4);
        assert!(config.create_if_missing);
        assert!(!config.sync_on_flush);
        assert_eq!(config.address_bits, 32);
    }

    #[test]
    fn test_from_json_rejects_bad_width() {
        let result = PageTableConfig::from_json(r#"{"address_bits": 40}"#);
        assert!(matches!(result, Err(Error::ConfigError(_))));

        let result = PageTableConfig::from_json("not json");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
