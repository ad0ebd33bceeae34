//! Flash erasing and programming.
//!
//! A [`FlashSession`] downloads the flash algorithm attached to a flash region
//! into target RAM and calls its entry points through a
//! [`TargetInterface`](crate::TargetInterface). Programming goes through the
//! algorithm's page buffers, alternating between two of them when the
//! algorithm provides two.
//!
//! ## Example
//!
//! ```no_run
//! use flashmap::flashing::{FlashOptions, FlashSession};
//! use flashmap::{Registry, TargetInterface};
//!
//! fn flash(interface: &mut dyn TargetInterface) -> anyhow::Result<()> {
//!     let target = Registry::builtin().get_target_by_name("KL25Z")?;
//!
//!     let span = tracing::info_span!("flash", chip = %target.name);
//!     let mut session = FlashSession::new(interface, &target, FlashOptions::default(), span);
//!
//!     session.download(0x1000, &[0x1, 0x2, 0x3, 0x4])?;
//!     Ok(())
//! }
//! ```

pub(crate) mod analyzer;
mod builder;
mod error;
mod flasher;
mod options;
mod progress;
mod session;

pub use builder::{FlashFill, FlashLayout, FlashPage, FlashSector};
pub use error::*;
pub use options::*;
pub use progress::*;
pub use session::FlashSession;
