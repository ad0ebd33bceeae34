//! # Flash algorithms on target RAM
//!
//! flashmap knows where flash and RAM live on a set of microcontrollers and
//! which flash algorithm erases and programs each flash region. It loads those
//! algorithms into target RAM and calls their entry points through a debug
//! probe, which is abstracted by [`TargetInterface`].
//!
//! # Examples
//!
//! ## Finding the region of an address
//!
//! ```
//! use flashmap::Registry;
//!
//! let target = Registry::builtin().get_target_by_name("nRF5340")?;
//!
//! let region = target.memory_map.find_flash_region(0x0100_0000, None).unwrap();
//! assert_eq!(region.core_index, 1);
//! # Ok::<(), flashmap::RegistryError>(())
//! ```
//!
//! ## Programming data
//!
//! ```no_run
//! use flashmap::flashing::{FlashOptions, FlashSession};
//! use flashmap::{Registry, TargetInterface};
//!
//! fn program(interface: &mut dyn TargetInterface) -> anyhow::Result<()> {
//!     let target = Registry::builtin().get_target_by_name("KL25Z")?;
//!     let mut session = FlashSession::new(
//!         interface,
//!         &target,
//!         FlashOptions::default(),
//!         tracing::info_span!("kl25z"),
//!     );
//!
//!     session.erase_sectors(0x1000..0x1400)?;
//!     session.program(0x1000, &[0xaa; 0x400])?;
//!     Ok(())
//! }
//! ```

#[warn(missing_docs)]
pub mod flashing;
#[warn(missing_docs)]
mod interface;
pub mod target;


pub use flashmap_target as config;

pub use crate::interface::{CoreRegister, CoreStatus, HaltReason, InterfaceError, TargetInterface};
pub use crate::target::registry::{Registry, RegistryError};
pub use crate::target::{FlashDriver, GenericFlashDriver, SvdLocation, Target, TargetError};
