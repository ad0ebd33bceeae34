//! Target description schema
//!
//! Describes where flash and RAM live on a chip, and which flash algorithm is
//! loaded into RAM to erase and program each flash region.
//!
//! Everything in this crate is plain data plus validation. Executing the
//! algorithms is left to the `flashmap` crate.
#![warn(missing_docs)]

mod error;
mod flash_algorithm;
mod memory;
mod memory_map;
pub(crate) mod serialize;

pub use error::{AlgorithmError, MemoryMapError};
pub use flash_algorithm::{
    code_address, instructions_from_words, FlashAlgorithm, ANALYZER_RESERVED_SIZE,
};
pub use memory::{
    FlashRegion, MemoryRange, MemoryRegion, PageInfo, RamRegion, SectorDescription, SectorInfo,
};
pub use memory_map::MemoryMap;
