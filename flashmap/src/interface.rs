//! The probe side of flashing.
//!
//! Everything the engine needs from a debug probe is expressed by
//! [`TargetInterface`]. Implementations wrap a real probe connection; the
//! engine itself never talks to hardware directly.

use std::time::{Duration, Instant};

/// The Cortex-M core registers used by the flash algorithm calling convention.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum CoreRegister {
    /// First argument and result register.
    R0,
    /// Second argument register.
    R1,
    /// Third argument register.
    R2,
    /// Fourth argument register.
    R3,
    /// Static base register.
    R9,
    /// Stack pointer.
    Sp,
    /// Link register.
    Lr,
    /// Program counter.
    Pc,
}

impl CoreRegister {
    /// The register holding argument `index` of a call.
    pub fn argument(index: usize) -> Option<Self> {
        match index {
            0 => Some(CoreRegister::R0),
            1 => Some(CoreRegister::R1),
            2 => Some(CoreRegister::R2),
            3 => Some(CoreRegister::R3),
            _ => None,
        }
    }

    /// The register holding the result of a call.
    pub fn result() -> Self {
        CoreRegister::R0
    }

    /// The conventional name of the register.
    pub fn name(&self) -> &'static str {
        match self {
            CoreRegister::R0 => "R0",
            CoreRegister::R1 => "R1",
            CoreRegister::R2 => "R2",
            CoreRegister::R3 => "R3",
            CoreRegister::R9 => "R9",
            CoreRegister::Sp => "SP",
            CoreRegister::Lr => "LR",
            CoreRegister::Pc => "PC",
        }
    }
}

/// The reason why a core was halted.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum HaltReason {
    /// Core halted due to a breakpoint.
    Breakpoint,
    /// Core halted due to an exception, e.g. a hard fault.
    Exception,
    /// Core halted because of a debugger request
    Request,
    /// Core halted after a reset with reset catch enabled.
    Reset,
    /// Unknown reason for halt.
    Unknown,
}

/// The status of the core.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CoreStatus {
    /// The core is currently running.
    Running,
    /// The core is currently halted. This also specifies the reason as a payload.
    Halted(HaltReason),
    /// The core is locked up after a double fault.
    LockedUp,
    /// The core is currently sleeping.
    Sleeping,
    /// The core state is currently unknown.
    Unknown,
}

impl CoreStatus {
    /// Returns `true` if the core is currently halted.
    pub fn is_halted(&self) -> bool {
        matches!(self, CoreStatus::Halted(_))
    }

    /// Returns `true` if the core is currently running.
    pub fn is_running(&self) -> bool {
        self == &Self::Running
    }
}

/// Failures reported by a [`TargetInterface`].
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// A memory transfer was rejected by the target.
    #[error("memory access of {length} bytes at {address:#010x} failed")]
    MemoryAccess {
        /// Start of the access.
        address: u64,
        /// Length of the access in bytes.
        length: usize,
    },
    /// The addressed core does not exist.
    #[error("core {0} does not exist")]
    NoSuchCore(usize),
    /// An operation did not finish in time.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    /// A value does not fit into a 32-bit register.
    #[error("value {0:#x} does not fit into a register")]
    RegisterValueNotSupported(u64),
    /// Any other error of the probe implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Access to the memory and cores of a target through a debug probe.
///
/// The connection is exclusively owned by whoever holds the `&mut`; it is
/// never shared between threads.
pub trait TargetInterface {
    /// Reads `data.len()` bytes starting at `address` as seen by core `core_index`.
    fn read_memory(
        &mut self,
        core_index: usize,
        address: u64,
        data: &mut [u8],
    ) -> Result<(), InterfaceError>;

    /// Writes `data` starting at `address` as seen by core `core_index`.
    fn write_memory(
        &mut self,
        core_index: usize,
        address: u64,
        data: &[u8],
    ) -> Result<(), InterfaceError>;

    /// Writes a core register. The core must be halted.
    fn set_register(
        &mut self,
        core_index: usize,
        register: CoreRegister,
        value: u32,
    ) -> Result<(), InterfaceError>;

    /// Reads a core register. The core must be halted.
    fn read_register(
        &mut self,
        core_index: usize,
        register: CoreRegister,
    ) -> Result<u32, InterfaceError>;

    /// Resumes the core without waiting for it to halt again.
    fn run(&mut self, core_index: usize) -> Result<(), InterfaceError>;

    /// Returns the current run state of the core.
    fn status(&mut self, core_index: usize) -> Result<CoreStatus, InterfaceError>;

    /// Requests the core to halt.
    fn halt(&mut self, core_index: usize) -> Result<(), InterfaceError>;

    /// Resets the core and halts it before the first instruction.
    fn reset_and_halt(&mut self, core_index: usize) -> Result<(), InterfaceError>;

    /// Resumes the core and polls until it halts again.
    fn run_until_halt(
        &mut self,
        core_index: usize,
        timeout: Duration,
    ) -> Result<HaltReason, InterfaceError> {
        self.run(core_index)?;

        let start = Instant::now();
        loop {
            if let CoreStatus::Halted(reason) = self.status(core_index)? {
                return Ok(reason);
            }
            if start.elapsed() >= timeout {
                return Err(InterfaceError::Timeout(timeout));
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
