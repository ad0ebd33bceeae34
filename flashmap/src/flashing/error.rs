use crate::interface::{CoreStatus, InterfaceError};
use std::ops::Range;
use std::time::Duration;

/// Describes any error that happened during the or in preparation for the flashing procedure.
#[derive(Debug, thiserror::Error)]
pub enum FlashError {
    /// No flash region covers the address.
    #[error("No flash region contains the address {address:#010x}.")]
    RegionNotFound {
        /// The requested address.
        address: u64,
    },
    /// The request starts inside a region but does not end there.
    #[error("The range {range:#010x?} is not contained in the region {region:#010x?}.")]
    AddressNotInRegion {
        /// The requested range.
        range: Range<u64>,
        /// The region containing the start of the request.
        region: Range<u64>,
    },
    /// The region has no flash algorithm attached.
    #[error("No flash algorithm is attached to the region at {address:#010x}.")]
    NoAlgorithm {
        /// Start of the region.
        address: u64,
    },
    /// Erase was requested on a region that cannot be erased.
    #[error("The region at {address:#010x} cannot be erased.")]
    RegionNotErasable {
        /// Start of the region.
        address: u64,
    },
    /// The algorithm image did not read back as written.
    #[error("The RAM contents did not match the flash algorithm image at {address:#010x} after loading it.")]
    AlgorithmNotLoaded {
        /// First mismatching address.
        address: u64,
    },
    /// `Init()` returned a non-zero result.
    #[error("The flash algorithm init for {address:#010x} failed with code {error_code}.")]
    AlgorithmInitFailed {
        /// The flash base address passed to init.
        address: u64,
        /// Result returned by the routine.
        error_code: u32,
    },
    /// `EraseSector()` or `EraseAll()` returned a non-zero result.
    #[error("Erasing at {address:#010x} failed with code {error_code}. Perhaps your chip has write protected sectors that need to be cleared?")]
    EraseFailed {
        /// Address of the sector, or of the region for a chip erase.
        address: u64,
        /// Result returned by the routine.
        error_code: u32,
    },
    /// `ProgramPage()` returned a non-zero result.
    #[error("The page write of the page at address {address:#010x} failed with code {error_code}.")]
    ProgramFailed {
        /// Address of the page.
        address: u64,
        /// Result returned by the routine.
        error_code: u32,
    },
    /// Programming targets a sector that was not erased in this session, or
    /// a page that was programmed since the last erase.
    #[error("The sector at {address:#010x} is not erased.")]
    SectorNotErased {
        /// Address of the sector.
        address: u64,
    },
    /// A routine ended in a fault instead of returning.
    #[error("The flash algorithm routine '{routine}' faulted, the core status is {status:?}.")]
    RoutineFault {
        /// Name of the routine.
        routine: &'static str,
        /// Status of the core after the fault.
        status: CoreStatus,
    },
    /// A routine did not return before its watchdog expired.
    #[error("The flash algorithm routine '{routine}' did not return within {timeout:?}.")]
    AlgorithmHung {
        /// Name of the routine.
        routine: &'static str,
        /// The watchdog that expired.
        timeout: Duration,
    },
    /// A helper routine returned a non-zero result.
    #[error("The execution of '{name}' failed with code {error_code}")]
    RoutineCallFailed {
        /// Name of the routine.
        name: &'static str,
        /// Result returned by the routine.
        error_code: u32,
    },
    /// The session was cancelled through its [`CancelHandle`](super::CancelHandle).
    #[error("Flashing was cancelled.")]
    Cancelled,
    /// An address or value does not fit into a 32-bit register.
    #[error("The value {0:#x} does not fit into a register.")]
    RegisterValueNotSupported(u64),
    /// The probe reported an error.
    #[error("Something during the interaction with the target went wrong")]
    Interface(#[from] InterfaceError),
}

impl FlashError {
    /// Errors after which the algorithm can no longer be trusted to be
    /// resident and idle, so no further routine may be called.
    pub(super) fn leaves_algorithm_unusable(&self) -> bool {
        matches!(
            self,
            FlashError::AlgorithmHung { .. }
                | FlashError::RoutineFault { .. }
                | FlashError::Interface(_)
        )
    }
}
