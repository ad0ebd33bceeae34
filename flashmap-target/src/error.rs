use std::ops::Range;

/// A flash algorithm descriptor that cannot be used safely.
///
/// These are always bugs in a target definition and are reported when the
/// descriptor or the memory map holding it is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    /// The instruction image is empty.
    #[error("the instruction image is empty")]
    EmptyImage,
    /// The instruction image is not made of whole 32-bit words.
    #[error("the instruction image is {length} bytes long, which is not a multiple of 4")]
    UnalignedImage {
        /// Length of the image in bytes.
        length: usize,
    },
    /// Only one or two page buffers are supported.
    #[error("{count} page buffers given, expected 1 or 2")]
    PageBufferCount {
        /// Number of page buffers.
        count: usize,
    },
    /// Both page buffers point at the same address.
    #[error("both page buffers start at {address:#010x}")]
    DuplicatePageBuffer {
        /// The shared buffer address.
        address: u64,
    },
    /// An entry point lies below the load address.
    #[error("entry point {routine} at {address:#010x} lies before the load address {load_address:#010x}")]
    EntryPointBeforeImage {
        /// Name of the routine.
        routine: &'static str,
        /// Address of the entry point.
        address: u64,
        /// Load address of the image.
        load_address: u64,
    },
    /// An entry point past the image is not backed by RAM of the owning core.
    #[error("entry point {routine} at {address:#010x} is outside the image and not in RAM of core {core_index}")]
    EntryPointOutsideRam {
        /// Name of the routine.
        routine: &'static str,
        /// Address of the entry point.
        address: u64,
        /// The core owning the flash region.
        core_index: usize,
    },
    /// The static base does not lie within or directly after the image.
    #[error("static base {static_base:#010x} is outside the image {image:#010x?}")]
    StaticBaseOutsideImage {
        /// The static base.
        static_base: u64,
        /// The span of the loaded image.
        image: Range<u64>,
    },
    /// A scratch address would be overwritten by the image, or overwrite it.
    #[error("{what} at {address:#010x} overlaps the image {image:#010x?}")]
    OverlapsImage {
        /// Which scratch area overlaps.
        what: &'static str,
        /// Start of the scratch area.
        address: u64,
        /// The span of the loaded image.
        image: Range<u64>,
    },
    /// The two page buffers overlap each other.
    #[error("page buffers {first:#010x} and {second:#010x} overlap for a page size of {page_size:#x}")]
    OverlappingPageBuffers {
        /// The first buffer.
        first: u64,
        /// The second buffer.
        second: u64,
        /// The page size of the region.
        page_size: u64,
    },
    /// The analyzer is enabled but has no address.
    #[error("analyzer is supported but no analyzer address is given")]
    MissingAnalyzerAddress,
    /// The analyzer address is not word aligned.
    #[error("analyzer address {address:#010x} is not word aligned")]
    UnalignedAnalyzer {
        /// The analyzer address.
        address: u64,
    },
    /// The analyzer extent is not in RAM of the owning core, or collides with the algorithm.
    #[error("analyzer at {address:#010x} cannot be placed: {reason}")]
    AnalyzerPlacement {
        /// The analyzer address.
        address: u64,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The minimum program length is zero.
    #[error("minimum program length is zero")]
    ZeroMinProgramLength,
    /// The page size is zero.
    #[error("page size is zero")]
    ZeroPageSize,
    /// The minimum program length does not divide a size it must divide.
    #[error("minimum program length {min_program_length:#x} does not divide the {what} {size:#x}")]
    MinProgramLengthMismatch {
        /// The minimum program length.
        min_program_length: u64,
        /// The size that should be a multiple of it.
        what: &'static str,
        /// The size.
        size: u64,
    },
    /// The sector sizes do not describe the region.
    #[error("sector layout at offset {offset:#x} is invalid: {reason}")]
    SectorLayout {
        /// Offset of the offending sector group.
        offset: u64,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Errors raised while building a [`MemoryMap`](crate::MemoryMap).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryMapError {
    /// A region has no extent.
    #[error("region {name} is empty: {range:#010x?}")]
    EmptyRegion {
        /// Name of the region.
        name: String,
        /// Range of the region.
        range: Range<u64>,
    },
    /// A flash region has a zero block size.
    #[error("flash region {name} has a block size of zero")]
    ZeroBlocksize {
        /// Name of the region.
        name: String,
    },
    /// Two regions of the same core share addresses.
    #[error("regions {first} and {second} of core {core_index} overlap")]
    OverlappingRegions {
        /// Name of the first region.
        first: String,
        /// Name of the second region.
        second: String,
        /// The core both regions belong to.
        core_index: usize,
    },
    /// A flash algorithm failed validation against its region.
    #[error("malformed flash algorithm {algorithm} for region {region}")]
    MalformedAlgorithm {
        /// Name of the algorithm.
        algorithm: String,
        /// Name of the region the algorithm is attached to.
        region: String,
        /// What is wrong with it.
        #[source]
        source: AlgorithmError,
    },
}
