use crate::error::MemoryMapError;
use crate::memory::{FlashRegion, MemoryRange, MemoryRegion, RamRegion};
use serde::{Deserialize, Deserializer, Serialize};

/// The validated, ordered set of regions of one chip.
///
/// Regions are sorted by start address. Regions of the same core never
/// overlap, but regions of different cores may share addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MemoryMap {
    regions: Vec<MemoryRegion>,
}

impl MemoryMap {
    /// Builds a memory map, validating the regions and every flash algorithm
    /// attached to them.
    pub fn new(mut regions: Vec<MemoryRegion>) -> Result<Self, MemoryMapError> {
        regions.sort_by_key(|region| (region.address_range().start, region.core_index()));

        for region in &regions {
            if region.address_range().is_empty() {
                return Err(MemoryMapError::EmptyRegion {
                    name: region_name(region),
                    range: region.address_range(),
                });
            }
            if let MemoryRegion::Flash(flash) = region {
                if flash.blocksize == 0 {
                    return Err(MemoryMapError::ZeroBlocksize {
                        name: region_name(region),
                    });
                }
            }
        }

        for (index, first) in regions.iter().enumerate() {
            let overlapping = regions[index + 1..].iter().find(|second| {
                second.core_index() == first.core_index()
                    && second
                        .address_range()
                        .intersects_range(&first.address_range())
            });
            if let Some(second) = overlapping {
                return Err(MemoryMapError::OverlappingRegions {
                    first: region_name(first),
                    second: region_name(second),
                    core_index: first.core_index(),
                });
            }
        }

        let map = MemoryMap { regions };
        let ram_regions: Vec<&RamRegion> = map.ram_regions().collect();
        for flash in map.flash_regions() {
            if let Some(algorithm) = &flash.algorithm {
                algorithm
                    .validate_for_region(flash, &ram_regions)
                    .map_err(|source| MemoryMapError::MalformedAlgorithm {
                        algorithm: algorithm.name.clone(),
                        region: flash
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("{:#010x}", flash.range.start)),
                        source,
                    })?;
            }
        }

        Ok(map)
    }

    /// Iterate over all regions in ascending start address order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryRegion> {
        self.regions.iter()
    }

    /// The regions as a slice, in ascending start address order.
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// Iterate over all flash regions.
    pub fn flash_regions(&self) -> impl Iterator<Item = &FlashRegion> {
        self.regions.iter().filter_map(MemoryRegion::as_flash_region)
    }

    /// Iterate over all RAM regions.
    pub fn ram_regions(&self) -> impl Iterator<Item = &RamRegion> {
        self.regions.iter().filter_map(MemoryRegion::as_ram_region)
    }

    /// Returns the most specific region containing `address`.
    ///
    /// When `core_index` is given only regions of that core are considered.
    /// If several regions match, the shortest one wins.
    pub fn find_region_containing(
        &self,
        address: u64,
        core_index: Option<usize>,
    ) -> Option<&MemoryRegion> {
        self.regions
            .iter()
            .filter(|region| region.contains(address))
            .filter(|region| core_index.map_or(true, |core| region.core_index() == core))
            .min_by_key(|region| {
                let range = region.address_range();
                range.end - range.start
            })
    }

    /// Returns the flash region containing `address`, if the most specific
    /// region at that address is flash.
    pub fn find_flash_region(
        &self,
        address: u64,
        core_index: Option<usize>,
    ) -> Option<&FlashRegion> {
        self.find_region_containing(address, core_index)
            .and_then(MemoryRegion::as_flash_region)
    }

    /// Returns the RAM region containing `address`.
    pub fn ram_region_containing(
        &self,
        address: u64,
        core_index: Option<usize>,
    ) -> Option<&RamRegion> {
        self.ram_regions()
            .filter(|region| core_index.map_or(true, |core| region.core_index == core))
            .find(|region| region.range.contains(&address))
    }

    /// Returns the region the chip boots from.
    pub fn get_boot_memory(&self, core_index: Option<usize>) -> Option<&MemoryRegion> {
        self.regions
            .iter()
            .filter(|region| core_index.map_or(true, |core| region.core_index() == core))
            .find(|region| region.is_boot_memory())
    }

    /// All core indices owning at least one region, ascending.
    pub fn cores(&self) -> Vec<usize> {
        let mut cores: Vec<usize> = self.regions.iter().map(MemoryRegion::core_index).collect();
        cores.sort_unstable();
        cores.dedup();
        cores
    }
}

impl<'de> Deserialize<'de> for MemoryMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let regions = Vec::<MemoryRegion>::deserialize(deserializer)?;
        MemoryMap::new(regions).map_err(serde::de::Error::custom)
    }
}

fn region_name(region: &MemoryRegion) -> String {
    match region.name() {
        Some(name) => name.to_string(),
        None => format!("{:#010x?}", region.address_range()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlgorithmError;
    use crate::flash_algorithm::{instructions_from_words, FlashAlgorithm};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn flash(name: &str, start: u64, length: u64, core_index: usize) -> MemoryRegion {
        MemoryRegion::Flash(FlashRegion {
            name: Some(name.to_string()),
            range: start..start + length,
            blocksize: 0x400,
            is_boot_memory: start == 0,
            is_erasable: true,
            erased_byte_value: 0xFF,
            core_index,
            algorithm: None,
        })
    }

    fn ram(name: &str, start: u64, length: u64, core_index: usize) -> MemoryRegion {
        MemoryRegion::Ram(RamRegion {
            name: Some(name.to_string()),
            range: start..start + length,
            is_boot_memory: false,
            core_index,
        })
    }

    fn dual_core() -> MemoryMap {
        MemoryMap::new(vec![
            ram("ram1", 0x2100_0000, 0x1_0000, 1),
            flash("flash0", 0, 0x10_0000, 0),
            flash("flash1", 0x0100_0000, 0x4_0000, 1),
            ram("ram0", 0x2000_0000, 0x8_0000, 0),
            ram("shared", 0x2000_0000, 0x1000, 1),
        ])
        .unwrap()
    }

    #[test]
    fn regions_are_sorted() {
        let map = dual_core();
        let names: Vec<_> = map.iter().filter_map(MemoryRegion::name).collect();
        assert_eq!(names, vec!["flash0", "flash1", "ram0", "shared", "ram1"]);
        assert_eq!(map.cores(), vec![0, 1]);
    }

    #[test]
    fn find_region_scoped_to_core() {
        let map = dual_core();

        let region = map.find_region_containing(0x2000_0010, Some(1)).unwrap();
        assert_eq!(region.name(), Some("shared"));

        let region = map.find_region_containing(0x2000_0010, Some(0)).unwrap();
        assert_eq!(region.name(), Some("ram0"));

        // Without a core, the most specific region wins.
        let region = map.find_region_containing(0x2000_0010, None).unwrap();
        assert_eq!(region.name(), Some("shared"));

        assert!(map.find_region_containing(0x0100_0000, Some(0)).is_none());
        assert!(map.find_region_containing(0x4000_0000, None).is_none());
    }

    #[test]
    fn find_flash_region() {
        let map = dual_core();
        assert_eq!(
            map.find_flash_region(0x0100_0800, None)
                .and_then(|r| r.name.as_deref()),
            Some("flash1")
        );
        assert!(map.find_flash_region(0x2000_0000, None).is_none());
        assert_eq!(
            map.ram_region_containing(0x2000_0000, Some(0))
                .and_then(|r| r.name.as_deref()),
            Some("ram0")
        );
    }

    #[test]
    fn boot_memory() {
        let map = dual_core();
        assert_eq!(
            map.get_boot_memory(None).and_then(MemoryRegion::name),
            Some("flash0")
        );
        assert!(map.get_boot_memory(Some(1)).is_none());
    }

    #[test]
    fn overlapping_regions_of_one_core() {
        let result = MemoryMap::new(vec![
            flash("a", 0, 0x1000, 0),
            ram("b", 0x800, 0x1000, 0),
        ]);
        assert_eq!(
            result,
            Err(MemoryMapError::OverlappingRegions {
                first: "a".to_string(),
                second: "b".to_string(),
                core_index: 0,
            })
        );
    }

    #[test]
    fn adjacent_regions_are_fine() {
        let result = MemoryMap::new(vec![flash("a", 0, 0x1000, 0), ram("b", 0x1000, 0x1000, 0)]);
        assert!(result.is_ok());
    }

    #[test]
    fn empty_region() {
        let result = MemoryMap::new(vec![flash("a", 0x1000, 0, 0)]);
        assert!(matches!(result, Err(MemoryMapError::EmptyRegion { .. })));
    }

    #[test]
    fn algorithm_is_validated_against_region() {
        let algorithm = FlashAlgorithm {
            name: "broken".to_string(),
            load_address: 0x2000_0000,
            instructions: instructions_from_words(&[0; 16]),
            pc_init: 0x2000_0001,
            pc_erase_sector: 0x2000_0001,
            pc_erase_all: 0x2000_0001,
            pc_program_page: 0x2000_0001,
            static_base: 0x2000_0040,
            begin_stack: 0x2000_1000,
            begin_data: 0x2000_1000,
            min_program_length: 0x300,
            page_buffers: vec![0x2000_0400],
            ..Default::default()
        };
        let MemoryRegion::Flash(mut region) = flash("flash", 0, 0x1000, 0) else {
            unreachable!()
        };
        region.algorithm = Some(Arc::new(algorithm));

        let result = MemoryMap::new(vec![
            MemoryRegion::Flash(region),
            ram("ram", 0x2000_0000, 0x2000, 0),
        ]);
        assert_eq!(
            result,
            Err(MemoryMapError::MalformedAlgorithm {
                algorithm: "broken".to_string(),
                region: "flash".to_string(),
                source: AlgorithmError::MinProgramLengthMismatch {
                    min_program_length: 0x300,
                    what: "block size",
                    size: 0x400,
                },
            })
        );
    }

    #[test]
    fn yaml_round_trip() {
        let map = dual_core();
        let yaml = serde_yaml::to_string(&map).unwrap();
        let parsed: MemoryMap = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn yaml_rejects_overlap() {
        let yaml = "
- !Ram
  range: { start: 0x0, end: 0x1000 }
- !Ram
  range: { start: 0x800, end: 0x1800 }
";
        let error = serde_yaml::from_str::<MemoryMap>(yaml).unwrap_err();
        assert!(error.to_string().contains("overlap"));
    }
}
