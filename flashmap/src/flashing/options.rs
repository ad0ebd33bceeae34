use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Watchdogs imposed on each call into the flash algorithm.
///
/// The algorithm itself has no notion of timeouts. If a routine does not
/// return within its watchdog, the session reports
/// [`FlashError::AlgorithmHung`](super::FlashError::AlgorithmHung).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineTimeouts {
    /// `Init()`
    pub init: Duration,
    /// `UnInit()`
    pub uninit: Duration,
    /// `EraseSector()`
    pub erase_sector: Duration,
    /// `EraseAll()`
    pub erase_all: Duration,
    /// `ProgramPage()`
    pub program_page: Duration,
    /// The CRC analyzer.
    pub analyzer: Duration,
}

impl Default for RoutineTimeouts {
    fn default() -> Self {
        Self {
            init: Duration::from_secs(2),
            uninit: Duration::from_secs(2),
            erase_sector: Duration::from_secs(2),
            erase_all: Duration::from_secs(30),
            program_page: Duration::from_secs(2),
            analyzer: Duration::from_secs(2),
        }
    }
}

impl RoutineTimeouts {
    /// Uses the same watchdog for every routine.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            init: timeout,
            uninit: timeout,
            erase_sector: timeout,
            erase_all: timeout,
            program_page: timeout,
            analyzer: timeout,
        }
    }
}

/// Options for a [`FlashSession`](super::FlashSession).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FlashOptions {
    /// Pipeline page transfers against programming when the algorithm has
    /// two page buffers.
    pub double_buffering: bool,
    /// Skip pages whose contents already match, when the algorithm supports the analyzer.
    pub use_analyzer: bool,
    /// If `true`, bytes of a touched sector that are not part of the request
    /// are read before erasing and written back afterwards. Otherwise they
    /// are left erased.
    pub keep_unwritten_bytes: bool,
    /// Clock frequency passed to `Init()`. 0 is passed when not set.
    pub clock: Option<u32>,
    /// Watchdogs for the algorithm routines.
    pub timeouts: RoutineTimeouts,
}

impl Default for FlashOptions {
    fn default() -> Self {
        Self {
            double_buffering: true,
            use_analyzer: true,
            keep_unwritten_bytes: false,
            clock: None,
            timeouts: RoutineTimeouts::default(),
        }
    }
}

/// Aborts a running session at the next page or sector boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates a handle that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
