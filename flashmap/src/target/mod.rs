//! Target specializations.
//!
//! A [`Target`] is a plain record describing one chip: its memory map with
//! the flash algorithms bound to the flash regions, the [`FlashDriver`] that
//! knows how to hand the debug connection from one core to another, and where
//! its peripheral description can be found. Built-in targets are created by
//! the factory functions in the [`Registry`](registry::Registry).

pub mod builtin;
pub mod registry;

use std::fmt::Debug;
use std::sync::Arc;

use flashmap_target::{MemoryMap, MemoryMapError};

use crate::interface::{InterfaceError, TargetInterface};

/// Errors while building a [`Target`].
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The memory map of the target is malformed.
    #[error("The memory map of the target is invalid.")]
    MemoryMap(#[from] MemoryMapError),
}

/// Where the peripheral register description (SVD) of a target is found.
///
/// The description is not loaded by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvdLocation {
    /// Vendor directory of the file, if any.
    pub vendor: Option<&'static str>,
    /// Name of the file.
    pub filename: &'static str,
    /// True if the file ships with the tool instead of a CMSIS pack.
    pub builtin: bool,
}

/// Chip specific behaviour of the flash programming process.
pub trait FlashDriver: Debug + Send + Sync {
    /// A human readable name of the driver.
    fn name(&self) -> &str;

    /// Makes `core_index` addressable for running a flash algorithm.
    ///
    /// Called once every time the session switches from one core to another,
    /// before the algorithm is loaded into the RAM of `core_index`.
    fn prepare_target(
        &self,
        interface: &mut dyn TargetInterface,
        core_index: usize,
    ) -> Result<(), InterfaceError> {
        let _ = (interface, core_index);
        Ok(())
    }
}

/// The flash driver of chips needing no special handling.
#[derive(Debug)]
pub struct GenericFlashDriver(());

impl GenericFlashDriver {
    /// Create a new generic flash driver.
    pub fn create() -> Arc<dyn FlashDriver> {
        Arc::new(Self(()))
    }
}

impl FlashDriver for GenericFlashDriver {
    fn name(&self) -> &str {
        "generic"
    }
}

/// This describes a complete target with a fixed chip model.
#[derive(Debug, Clone)]
pub struct Target {
    /// The name of the target.
    pub name: String,
    /// The part number the target is registered under.
    pub part_number: String,
    /// The memory map of the target.
    pub memory_map: MemoryMap,
    /// The chip specific flash behaviour.
    pub driver: Arc<dyn FlashDriver>,
    /// The peripheral description of the target.
    pub svd: Option<SvdLocation>,
    /// The core that is halted after a reset, the one owning the boot memory.
    pub reset_catch_core: usize,
}

impl Target {
    /// Creates a new target from its memory map.
    pub fn new(
        name: impl Into<String>,
        part_number: impl Into<String>,
        memory_map: MemoryMap,
        driver: Arc<dyn FlashDriver>,
        svd: Option<SvdLocation>,
    ) -> Self {
        let reset_catch_core = memory_map
            .get_boot_memory(None)
            .map_or(0, |region| region.core_index());

        Self {
            name: name.into(),
            part_number: part_number.into(),
            memory_map,
            driver,
            svd,
            reset_catch_core,
        }
    }
}
