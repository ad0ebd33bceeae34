use super::FlashLayout;
use std::time::Duration;

/// A structure to manage the flashing procedure progress reporting.
///
/// This struct stores a handler closure which will be called everytime an event happens during the flashing process.
///
/// # Example
///
/// ```
/// use flashmap::flashing::FlashProgress;
///
/// // Print events
/// let progress = FlashProgress::new(|event| println!("Event: {:#?}", event));
/// ```
pub struct FlashProgress {
    handler: Box<dyn Fn(ProgressEvent)>,
}

impl FlashProgress {
    /// Create a new `FlashProgress` structure with a given `handler` to be called on events.
    pub fn new(handler: impl Fn(ProgressEvent) + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// A progress handler that drops every event.
    pub fn empty() -> Self {
        Self::new(|_| {})
    }

    fn emit(&self, event: ProgressEvent) {
        (self.handler)(event);
    }

    pub(super) fn initialized(&self, flash_layout: FlashLayout) {
        self.emit(ProgressEvent::Initialized { flash_layout });
    }

    pub(super) fn started_erasing(&self) {
        self.emit(ProgressEvent::StartedErasing);
    }

    pub(super) fn sector_erased(&self, address: u64, size: u64, time: Duration) {
        self.emit(ProgressEvent::SectorErased {
            address,
            size,
            time,
        });
    }

    pub(super) fn sector_erase_failed(&self, address: u64, error_code: u32) {
        self.emit(ProgressEvent::SectorEraseFailed {
            address,
            error_code,
        });
    }

    pub(super) fn failed_erasing(&self) {
        self.emit(ProgressEvent::FailedErasing);
    }

    pub(super) fn finished_erasing(&self) {
        self.emit(ProgressEvent::FinishedErasing);
    }

    pub(super) fn started_programming(&self) {
        self.emit(ProgressEvent::StartedProgramming);
    }

    pub(super) fn page_programmed(&self, address: u64, size: u64, time: Duration) {
        self.emit(ProgressEvent::PageProgrammed {
            address,
            size,
            time,
        });
    }

    pub(super) fn page_skipped(&self, address: u64, size: u64) {
        self.emit(ProgressEvent::PageSkipped { address, size });
    }

    pub(super) fn failed_programming(&self) {
        self.emit(ProgressEvent::FailedProgramming);
    }

    pub(super) fn finished_programming(&self) {
        self.emit(ProgressEvent::FinishedProgramming);
    }
}

impl Default for FlashProgress {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FlashProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashProgress").finish_non_exhaustive()
    }
}

/// Possible events during the flashing process.
///
/// A successful `download` reports, in order:
///
/// * `Initialized`
/// * `StartedErasing`
/// * `SectorErased` for every sector
/// * `FinishedErasing`
/// * `StartedProgramming`
/// * `PageProgrammed` or `PageSkipped` for every page
/// * `FinishedProgramming`
///
/// A sector whose erase fails reports `SectorEraseFailed` and erasing goes on
/// with the next sector; the pass then ends with `FailedErasing`.
#[derive(Debug)]
pub enum ProgressEvent {
    /// The flash layout has been built and the flashing procedure was initialized.
    Initialized {
        /// The layout of the flash contents as it will be used by the flash procedure.
        flash_layout: FlashLayout,
    },
    /// Erasing of flash has started.
    StartedErasing,
    /// A sector has been erased successfully.
    SectorErased {
        /// The address of the sector.
        address: u64,
        /// The size of the sector in bytes.
        size: u64,
        /// The time it took to erase this sector.
        time: Duration,
    },
    /// The algorithm reported a failure erasing a sector.
    SectorEraseFailed {
        /// The address of the sector.
        address: u64,
        /// The result returned by the algorithm.
        error_code: u32,
    },
    /// Erasing of the flash has failed.
    FailedErasing,
    /// Erasing of the flash has finished successfully.
    FinishedErasing,
    /// Programming of the flash has started.
    StartedProgramming,
    /// A flash page has been programmed successfully.
    PageProgrammed {
        /// The address of the page.
        address: u64,
        /// The size of this page in bytes.
        size: u64,
        /// The time it took to program this page.
        time: Duration,
    },
    /// The analyzer found the page already holds the requested contents.
    PageSkipped {
        /// The address of the page.
        address: u64,
        /// The size of this page in bytes.
        size: u64,
    },
    /// Programming of the flash failed.
    FailedProgramming,
    /// Programming of the flash has finished successfully.
    FinishedProgramming,
}
