use crate::error::AlgorithmError;
use crate::memory::{FlashRegion, MemoryRange, RamRegion, SectorDescription};
use crate::serialize::{
    base64_deserialize, base64_serialize, hex_option, hex_option_deserialize, hex_u_int,
    hex_u_int_deserialize, hex_vec, hex_vec_deserialize,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of bytes reserved at the analyzer address: the CRC routine itself
/// followed by the table it builds at runtime.
pub const ANALYZER_RESERVED_SIZE: u64 = 0x600;

/// A flash algorithm, linked to run at a fixed RAM address.
///
/// The instruction image is position dependent and must be written to
/// `load_address` verbatim. All entry points are absolute addresses; they may
/// carry the Thumb bit.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlashAlgorithm {
    /// The name of the flash algorithm.
    pub name: String,
    /// Memory address where the flash algo instructions will be loaded to.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub load_address: u64,
    /// The little endian instruction image, a whole number of 32-bit words.
    #[serde(serialize_with = "base64_serialize", deserialize_with = "base64_deserialize")]
    pub instructions: Vec<u8>,
    /// Address of the `Init()` entry point.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub pc_init: u64,
    /// Address of the `UnInit()` entry point. Optional.
    #[serde(
        default,
        serialize_with = "hex_option",
        deserialize_with = "hex_option_deserialize"
    )]
    pub pc_uninit: Option<u64>,
    /// Address of the `EraseSector()` entry point.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub pc_erase_sector: u64,
    /// Address of the `EraseAll()` entry point.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub pc_erase_all: u64,
    /// Address of the `ProgramPage()` entry point.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub pc_program_page: u64,
    /// Initial value of the R9 register for calling flash algo entry points, which
    /// determines where the algorithm's data resides.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub static_base: u64,
    /// Initial value of the stack pointer when calling any flash algo API.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub begin_stack: u64,
    /// Scratch area used to exchange analyzer requests and results.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub begin_data: u64,
    /// Bytes handed to `ProgramPage()` per call. Falls back to the region block size.
    #[serde(
        default,
        serialize_with = "hex_option",
        deserialize_with = "hex_option_deserialize"
    )]
    pub page_size: Option<u32>,
    /// Smallest unit that can be programmed.
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_u_int_deserialize")]
    pub min_program_length: u32,
    /// A list of base addresses for page buffers. If two buffers are given,
    /// double buffered programming is possible.
    #[serde(serialize_with = "hex_vec", deserialize_with = "hex_vec_deserialize")]
    pub page_buffers: Vec<u64>,
    /// Whether the CRC analyzer may be used to skip unchanged pages.
    #[serde(default)]
    pub analyzer_supported: bool,
    /// Where the analyzer routine is loaded.
    #[serde(
        default,
        serialize_with = "hex_option",
        deserialize_with = "hex_option_deserialize"
    )]
    pub analyzer_address: Option<u64>,
    /// Non-uniform sector layout, relative to the start of the owning region.
    #[serde(default)]
    pub sector_sizes: Vec<SectorDescription>,
}

/// Converts a list of instruction words to the little endian image written to the target.
pub fn instructions_from_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

impl FlashAlgorithm {
    /// The first address after the loaded image.
    pub fn image_end(&self) -> u64 {
        self.load_address + self.instructions.len() as u64
    }

    /// The span of target RAM covered by the image.
    pub fn image_range(&self) -> Range<u64> {
        self.load_address..self.image_end()
    }

    /// The image as 32-bit words.
    pub fn instruction_words(&self) -> impl Iterator<Item = u32> + '_ {
        self.instructions
            .chunks_exact(4)
            .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// CRC-32 of the instruction image. Stable for a given chip and bank.
    pub fn fingerprint(&self) -> u32 {
        crc::crc32::checksum_ieee(&self.instructions)
    }

    /// All entry points with their routine names.
    pub fn entry_points(&self) -> impl Iterator<Item = (&'static str, u64)> {
        [
            Some(("init", self.pc_init)),
            self.pc_uninit.map(|pc| ("uninit", pc)),
            Some(("erase_sector", self.pc_erase_sector)),
            Some(("erase_all", self.pc_erase_all)),
            Some(("program_page", self.pc_program_page)),
        ]
        .into_iter()
        .flatten()
    }

    /// True when two page buffers allow pipelined programming.
    pub fn supports_double_buffering(&self) -> bool {
        self.page_buffers.len() == 2
    }

    /// The analyzer address, if the analyzer may be used.
    pub fn analyzer(&self) -> Option<u64> {
        if self.analyzer_supported {
            self.analyzer_address
        } else {
            None
        }
    }

    /// Checks the descriptor on its own.
    pub fn validate(&self) -> Result<(), AlgorithmError> {
        if self.instructions.is_empty() {
            return Err(AlgorithmError::EmptyImage);
        }
        if self.instructions.len() % 4 != 0 {
            return Err(AlgorithmError::UnalignedImage {
                length: self.instructions.len(),
            });
        }

        match self.page_buffers.as_slice() {
            [_] => {}
            [first, second] if first == second => {
                return Err(AlgorithmError::DuplicatePageBuffer { address: *first });
            }
            [_, _] => {}
            other => {
                return Err(AlgorithmError::PageBufferCount { count: other.len() });
            }
        }

        for (routine, address) in self.entry_points() {
            if code_address(address) < self.load_address {
                return Err(AlgorithmError::EntryPointBeforeImage {
                    routine,
                    address,
                    load_address: self.load_address,
                });
            }
        }

        let image = self.image_range();
        if self.static_base < self.load_address || self.static_base > image.end {
            return Err(AlgorithmError::StaticBaseOutsideImage {
                static_base: self.static_base,
                image,
            });
        }

        let scratch = [("stack", self.begin_stack), ("data area", self.begin_data)]
            .into_iter()
            .chain(self.page_buffers.iter().map(|b| ("page buffer", *b)));
        for (what, address) in scratch {
            if image.contains(&address) {
                return Err(AlgorithmError::OverlapsImage {
                    what,
                    address,
                    image,
                });
            }
        }

        if self.analyzer_supported {
            match self.analyzer_address {
                None => return Err(AlgorithmError::MissingAnalyzerAddress),
                Some(address) if address % 4 != 0 => {
                    return Err(AlgorithmError::UnalignedAnalyzer { address });
                }
                Some(_) => {}
            }
        }

        if self.min_program_length == 0 {
            return Err(AlgorithmError::ZeroMinProgramLength);
        }
        if self.page_size == Some(0) {
            return Err(AlgorithmError::ZeroPageSize);
        }

        Ok(())
    }

    /// Checks the descriptor against the flash region it programs and the RAM
    /// regions of the same core.
    pub fn validate_for_region(
        &self,
        region: &FlashRegion,
        ram_regions: &[&RamRegion],
    ) -> Result<(), AlgorithmError> {
        self.validate()?;

        let min_program_length = u64::from(self.min_program_length);
        let page_size = region.page_size();
        for (what, size) in [("block size", region.blocksize), ("page size", page_size)] {
            if size % min_program_length != 0 {
                return Err(AlgorithmError::MinProgramLengthMismatch {
                    min_program_length,
                    what,
                    size,
                });
            }
        }

        self.validate_sector_sizes(region.range.end - region.range.start)?;
        for sector in &self.sector_sizes {
            if sector.size % min_program_length != 0 {
                return Err(AlgorithmError::MinProgramLengthMismatch {
                    min_program_length,
                    what: "sector size",
                    size: sector.size,
                });
            }
        }

        let image = self.image_range();
        let buffers: Vec<Range<u64>> = self
            .page_buffers
            .iter()
            .map(|&b| b..b + page_size)
            .collect();
        for buffer in &buffers {
            if buffer.intersects_range(&image) {
                return Err(AlgorithmError::OverlapsImage {
                    what: "page buffer",
                    address: buffer.start,
                    image,
                });
            }
        }
        if let [first, second] = buffers.as_slice() {
            if first.intersects_range(second) {
                return Err(AlgorithmError::OverlappingPageBuffers {
                    first: first.start,
                    second: second.start,
                    page_size,
                });
            }
        }

        let core_ram = ram_regions
            .iter()
            .filter(|ram| ram.core_index == region.core_index)
            .collect::<Vec<_>>();

        for (routine, address) in self.entry_points() {
            if image.contains(&code_address(address)) {
                continue;
            }
            let backed = core_ram.iter().any(|ram| {
                ram.range.contains(&code_address(address)) && ram.range.contains(&self.load_address)
            });
            if !backed {
                return Err(AlgorithmError::EntryPointOutsideRam {
                    routine,
                    address,
                    core_index: region.core_index,
                });
            }
        }

        if let Some(address) = self.analyzer() {
            let extent = address..address + ANALYZER_RESERVED_SIZE;
            if !core_ram.iter().any(|ram| ram.range.contains_range(&extent)) {
                return Err(AlgorithmError::AnalyzerPlacement {
                    address,
                    reason: "not in RAM of the owning core",
                });
            }
            if extent.intersects_range(&image) {
                return Err(AlgorithmError::AnalyzerPlacement {
                    address,
                    reason: "overlaps the image",
                });
            }
            if buffers.iter().any(|b| b.intersects_range(&extent)) {
                return Err(AlgorithmError::AnalyzerPlacement {
                    address,
                    reason: "overlaps a page buffer",
                });
            }
        }

        Ok(())
    }

    fn validate_sector_sizes(&self, region_length: u64) -> Result<(), AlgorithmError> {
        let Some(first) = self.sector_sizes.first() else {
            return Ok(());
        };
        if first.address != 0 {
            return Err(AlgorithmError::SectorLayout {
                offset: first.address,
                reason: "first sector group must start at offset 0",
            });
        }

        for (index, sector) in self.sector_sizes.iter().enumerate() {
            if sector.size == 0 {
                return Err(AlgorithmError::SectorLayout {
                    offset: sector.address,
                    reason: "sector size is zero",
                });
            }
            let end = self
                .sector_sizes
                .get(index + 1)
                .map(|next| next.address)
                .unwrap_or(region_length);
            if end <= sector.address {
                return Err(AlgorithmError::SectorLayout {
                    offset: sector.address,
                    reason: "offsets are not ascending or exceed the region",
                });
            }
            if (end - sector.address) % sector.size != 0 {
                return Err(AlgorithmError::SectorLayout {
                    offset: sector.address,
                    reason: "group does not hold a whole number of sectors",
                });
            }
        }

        Ok(())
    }
}

/// Strips the Thumb bit from an entry point.
pub fn code_address(entry_point: u64) -> u64 {
    entry_point & !1
}
