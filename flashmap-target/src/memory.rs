use crate::flash_algorithm::FlashAlgorithm;
use crate::serialize::{
    hex_range, hex_range_deserialize, hex_u_int, hex_u_int_deserialize,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

fn default_true() -> bool {
    true
}

fn default_erased_byte_value() -> u8 {
    0xFF
}

/// Represents a region in flash memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlashRegion {
    /// A name to describe the region
    #[serde(default)]
    pub name: Option<String>,
    /// Address range of the region
    #[serde(serialize_with = "hex_range", deserialize_with = "hex_range_deserialize")]
    pub range: Range<u64>,
    /// Default erase granularity, used when the algorithm does not list
    /// its own sector sizes.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub blocksize: u64,
    /// True if the chip boots from this memory
    #[serde(default)]
    pub is_boot_memory: bool,
    /// False for regions that cannot be erased through the algorithm, such as UICR.
    #[serde(default = "default_true")]
    pub is_erasable: bool,
    /// The value read from an erased byte.
    #[serde(default = "default_erased_byte_value")]
    pub erased_byte_value: u8,
    /// The core owning this region.
    #[serde(default)]
    pub core_index: usize,
    /// The flash algorithm used to erase and program this region.
    #[serde(default)]
    pub algorithm: Option<Arc<FlashAlgorithm>>,
}

impl FlashRegion {
    /// The sector layout of this region, relative to its start address.
    ///
    /// Taken from the algorithm when it lists sector sizes, otherwise the whole
    /// region is split into blocks of `blocksize`.
    pub fn sector_descriptions(&self) -> Vec<SectorDescription> {
        match &self.algorithm {
            Some(algorithm) if !algorithm.sector_sizes.is_empty() => {
                algorithm.sector_sizes.clone()
            }
            _ => vec![SectorDescription {
                address: 0,
                size: self.blocksize,
            }],
        }
    }

    /// The number of bytes handed to the algorithm per program call.
    pub fn page_size(&self) -> u64 {
        self.algorithm
            .as_ref()
            .and_then(|algorithm| algorithm.page_size)
            .map(u64::from)
            .unwrap_or(self.blocksize)
    }

    /// Try to retrieve the information about the flash sector
    /// which contains `address`.
    ///
    /// If the `address` is not part of the region, None will
    /// be returned.
    pub fn sector_info(&self, address: u64) -> Option<SectorInfo> {
        if !self.range.contains(&address) {
            return None;
        }

        let offset_address = address - self.range.start;
        let sectors = self.sector_descriptions();
        let containing_sector = sectors.iter().rfind(|s| s.address <= offset_address)?;
        if containing_sector.size == 0 {
            return None;
        }

        let sector_index = (offset_address - containing_sector.address) / containing_sector.size;

        Some(SectorInfo {
            base_address: self.range.start
                + containing_sector.address
                + sector_index * containing_sector.size,
            size: containing_sector.size,
        })
    }

    /// Returns the page which `address` resides in, if the address is inside the region.
    pub fn page_info(&self, address: u64) -> Option<PageInfo> {
        if !self.range.contains(&address) {
            return None;
        }

        let page_size = self.page_size();
        if page_size == 0 {
            return None;
        }
        let offset = address - self.range.start;

        Some(PageInfo {
            base_address: address - (offset % page_size),
            size: page_size,
        })
    }

    /// Iterate over all the sectors of the region.
    pub fn iter_sectors(&self) -> impl Iterator<Item = SectorInfo> + '_ {
        let sectors = self.sector_descriptions();
        let mut addr = self.range.start;
        let mut desc_idx = 0;
        std::iter::from_fn(move || {
            if addr >= self.range.end {
                return None;
            }

            if let Some(next_desc) = sectors.get(desc_idx + 1) {
                if self.range.start + next_desc.address <= addr {
                    desc_idx += 1;
                }
            }

            let size = sectors[desc_idx].size;
            if size == 0 {
                return None;
            }
            let sector = SectorInfo {
                base_address: addr,
                size,
            };
            addr += size;

            Some(sector)
        })
    }
}

/// Represents a region in RAM.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RamRegion {
    /// A name to describe the region
    #[serde(default)]
    pub name: Option<String>,
    /// Address range of the region
    #[serde(serialize_with = "hex_range", deserialize_with = "hex_range_deserialize")]
    pub range: Range<u64>,
    /// True if the chip boots from this memory
    #[serde(default)]
    pub is_boot_memory: bool,
    /// The core owning this region.
    #[serde(default)]
    pub core_index: usize,
}

/// Holds information about a specific, individual flash
/// sector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SectorInfo {
    /// Base address of the flash sector
    pub base_address: u64,
    /// Size of the flash sector
    pub size: u64,
}

impl SectorInfo {
    /// Returns the address range of the sector.
    pub fn address_range(&self) -> Range<u64> {
        self.base_address..self.base_address + self.size
    }
}

/// Starting at the region relative offset `address`, all following
/// sectors have a size of `size`, until the end of the region or the next
/// `SectorDescription`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorDescription {
    /// Start of the group of sectors, relative to the start of the region.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub address: u64,
    /// Size of each individual sector
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub size: u64,
}

/// Holds information about a page in flash.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Base address of the page in flash.
    pub base_address: u64,
    /// Size of the page
    pub size: u64,
}

impl PageInfo {
    /// Returns the address range of the page.
    pub fn address_range(&self) -> Range<u64> {
        self.base_address..self.base_address + self.size
    }
}

/// Enables the user to do range intersection testing.
pub trait MemoryRange {
    /// Returns true if `self` contains `range` fully.
    fn contains_range(&self, range: &Range<u64>) -> bool;

    /// Returns true if `self` and `range` share at least one address.
    fn intersects_range(&self, range: &Range<u64>) -> bool;
}

impl MemoryRange for Range<u64> {
    fn contains_range(&self, range: &Range<u64>) -> bool {
        if range.end == 0 || range.is_empty() {
            false
        } else {
            self.contains(&range.start) && self.contains(&(range.end - 1))
        }
    }

    fn intersects_range(&self, range: &Range<u64>) -> bool {
        !self.is_empty() && !range.is_empty() && self.start < range.end && range.start < self.end
    }
}

/// Declares the type of a memory region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryRegion {
    /// Memory region describing RAM.
    Ram(RamRegion),
    /// Memory region describing flash.
    Flash(FlashRegion),
}

impl MemoryRegion {
    /// Returns the RAM region if this is a RAM region, otherwise None.
    pub fn as_ram_region(&self) -> Option<&RamRegion> {
        match self {
            MemoryRegion::Ram(region) => Some(region),
            _ => None,
        }
    }

    /// Returns the flash region if this is a flash region, otherwise None.
    pub fn as_flash_region(&self) -> Option<&FlashRegion> {
        match self {
            MemoryRegion::Flash(region) => Some(region),
            _ => None,
        }
    }

    /// Returns the address range of the memory region.
    pub fn address_range(&self) -> Range<u64> {
        match self {
            MemoryRegion::Ram(rr) => rr.range.clone(),
            MemoryRegion::Flash(fr) => fr.range.clone(),
        }
    }

    /// Returns whether the memory region contains the given address.
    pub fn contains(&self, address: u64) -> bool {
        self.address_range().contains(&address)
    }

    /// The name of the region, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            MemoryRegion::Ram(region) => region.name.as_deref(),
            MemoryRegion::Flash(region) => region.name.as_deref(),
        }
    }

    /// The core owning this region.
    pub fn core_index(&self) -> usize {
        match self {
            MemoryRegion::Ram(region) => region.core_index,
            MemoryRegion::Flash(region) => region.core_index,
        }
    }

    /// Returns whether the chip boots from this region.
    pub fn is_boot_memory(&self) -> bool {
        match self {
            MemoryRegion::Ram(region) => region.is_boot_memory,
            MemoryRegion::Flash(region) => region.is_boot_memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0..1, 0..1 => true; "identical")]
    #[test_case(0..1, 0..2 => false; "longer")]
    #[test_case(0..4, 0..1 => true; "prefix")]
    #[test_case(4..8, 3..9 => false; "enclosing")]
    #[test_case(4..8, 0..1 => false; "disjoint")]
    #[test_case(4..8, 6..8 => true; "suffix")]
    #[test_case(4..8, 6..6 => false; "empty")]
    fn contains_range(outer: Range<u64>, inner: Range<u64>) -> bool {
        outer.contains_range(&inner)
    }

    #[test_case(0..1, 0..1 => true; "identical")]
    #[test_case(0..1, 0..2 => true; "longer")]
    #[test_case(4..8, 3..9 => true; "enclosing")]
    #[test_case(4..8, 0..1 => false; "disjoint")]
    #[test_case(4..8, 3..4 => false; "touching below")]
    #[test_case(8..9, 6..8 => false; "touching above")]
    #[test_case(4..8, 7..12 => true; "overlapping end")]
    fn intersects_range(a: Range<u64>, b: Range<u64>) -> bool {
        a.intersects_range(&b)
    }

    fn region(blocksize: u64, sector_sizes: Vec<SectorDescription>) -> FlashRegion {
        FlashRegion {
            name: None,
            range: 0x1000..0x3000,
            blocksize,
            is_boot_memory: false,
            is_erasable: true,
            erased_byte_value: 0xFF,
            core_index: 0,
            algorithm: Some(Arc::new(FlashAlgorithm {
                sector_sizes,
                page_size: Some(0x80),
                ..Default::default()
            })),
        }
    }

    #[test]
    fn flash_sector_single_size() {
        let region = region(0x400, vec![]);

        assert!(region.sector_info(0x1000 - 1).is_none());
        assert_eq!(
            region.sector_info(0x1000),
            Some(SectorInfo {
                base_address: 0x1000,
                size: 0x400
            })
        );
        assert_eq!(
            region.sector_info(0x17ff),
            Some(SectorInfo {
                base_address: 0x1400,
                size: 0x400
            })
        );
        assert!(region.sector_info(0x3000).is_none());
        assert_eq!(region.iter_sectors().count(), 8);
    }

    #[test]
    fn flash_sector_multiple_sizes() {
        let mut region = region(
            0x400,
            vec![
                SectorDescription {
                    address: 0,
                    size: 0x100,
                },
                SectorDescription {
                    address: 0x400,
                    size: 0x800,
                },
            ],
        );
        region.range = 0x1000..0x3400;

        assert_eq!(
            region.sector_info(0x1350),
            Some(SectorInfo {
                base_address: 0x1300,
                size: 0x100
            })
        );
        assert_eq!(
            region.sector_info(0x2000),
            Some(SectorInfo {
                base_address: 0x1c00,
                size: 0x800
            })
        );

        let sectors: Vec<_> = region.iter_sectors().map(|s| s.base_address).collect();
        assert_eq!(
            sectors,
            vec![0x1000, 0x1100, 0x1200, 0x1300, 0x1400, 0x1c00, 0x2400, 0x2c00]
        );
    }

    #[test]
    fn page_size_falls_back_to_blocksize() {
        let mut region = region(0x400, vec![]);
        assert_eq!(
            region.page_info(0x10a0),
            Some(PageInfo {
                base_address: 0x1080,
                size: 0x80
            })
        );

        region.algorithm = None;
        assert_eq!(region.page_size(), 0x400);
        assert_eq!(region.page_info(0x17ff).map(|p| p.base_address), Some(0x1400));
    }
}
