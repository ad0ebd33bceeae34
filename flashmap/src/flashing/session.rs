use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use flashmap_target::{FlashAlgorithm, FlashRegion, MemoryRange, SectorInfo};

use super::analyzer::{crc32, encode_request};
use super::builder::build_layout;
use super::flasher::{self, Flasher, SectorState};
use super::{CancelHandle, FlashError, FlashLayout, FlashOptions, FlashPage, FlashProgress};
use crate::interface::TargetInterface;
use crate::target::Target;

/// A flashing session on one target connection.
///
/// The session owns the probe connection for its lifetime. It tracks which
/// core is halted, which algorithm is resident in the RAM of each core and
/// which sectors were erased, so that a sector is never programmed before it
/// was erased in the same session.
///
/// All activity of the session is recorded inside the [`tracing::Span`]
/// passed to [`FlashSession::new`].
pub struct FlashSession<'session> {
    interface: &'session mut dyn TargetInterface,
    target: &'session Target,
    options: FlashOptions,
    progress: FlashProgress,
    cancel: CancelHandle,
    span: tracing::Span,
    halted_core: usize,
    loaded: HashMap<usize, Arc<FlashAlgorithm>>,
    analyzer_enabled: bool,
    analyzer_loaded: HashSet<usize>,
    sectors: HashMap<(usize, u64), SectorState>,
    programmed: HashSet<(usize, u64)>,
}

impl<'session> FlashSession<'session> {
    /// Opens a session for `target` through `interface`.
    ///
    /// The core the target catches after reset is assumed to be the halted one.
    pub fn new(
        interface: &'session mut dyn TargetInterface,
        target: &'session Target,
        options: FlashOptions,
        span: tracing::Span,
    ) -> Self {
        let halted_core = target.reset_catch_core;
        span.in_scope(|| {
            tracing::debug!(
                "Opening flash session for {} with core {} halted",
                target.name,
                halted_core
            )
        });

        Self {
            interface,
            target,
            options,
            progress: FlashProgress::empty(),
            cancel: CancelHandle::new(),
            span,
            halted_core,
            loaded: HashMap::new(),
            analyzer_enabled: true,
            analyzer_loaded: HashSet::new(),
            sectors: HashMap::new(),
            programmed: HashSet::new(),
        }
    }

    /// Reports the progress of every operation to `progress`.
    pub fn with_progress(mut self, progress: FlashProgress) -> Self {
        self.progress = progress;
        self
    }

    /// A handle that stops the running operation at the next page or sector boundary.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// The target this session flashes.
    pub fn target(&self) -> &Target {
        self.target
    }

    /// The core the session currently drives.
    pub fn halted_core(&self) -> usize {
        self.halted_core
    }

    /// False once an analyzer call failed in this session.
    pub fn analyzer_enabled(&self) -> bool {
        self.analyzer_enabled
    }

    /// True if the sector containing `address` was erased successfully in this
    /// session and none of its pages was programmed since.
    pub fn is_sector_erased(&self, address: u64) -> bool {
        let Ok(region) = self.flash_region(address) else {
            return false;
        };
        region.sector_info(address).is_some_and(|sector| {
            let key = (region.core_index, sector.base_address);
            self.sectors.get(&key) == Some(&SectorState::Erased)
                && !self.has_programmed(region.core_index, &sector.address_range())
        })
    }

    /// Reads target memory as seen by the core owning `address`.
    pub fn read(&mut self, address: u64, data: &mut [u8]) -> Result<(), FlashError> {
        let core_index = self
            .target
            .memory_map
            .find_region_containing(address, None)
            .map_or(self.halted_core, |region| region.core_index());
        self.interface.read_memory(core_index, address, data)?;
        Ok(())
    }

    /// Erases every sector intersecting `range`.
    ///
    /// All sectors are attempted even if some fail; the first failure is
    /// returned afterwards.
    pub fn erase_sectors(&mut self, range: Range<u64>) -> Result<(), FlashError> {
        let _span = self.span.clone().entered();
        if range.is_empty() {
            return Ok(());
        }

        let region = self.flash_region(range.start)?;
        if !region.is_erasable {
            return Err(FlashError::RegionNotErasable {
                address: region.range.start,
            });
        }
        if !region.range.contains_range(&range) {
            return Err(FlashError::AddressNotInRegion {
                range,
                region: region.range.clone(),
            });
        }

        let sectors: Vec<SectorInfo> = region
            .iter_sectors()
            .filter(|sector| sector.address_range().intersects_range(&range))
            .collect();

        tracing::info!(
            "Erasing {} sectors in {:#010x}..{:#010x}",
            sectors.len(),
            range.start,
            range.end
        );
        self.erase(region, &sectors)
    }

    /// Erases the whole flash region containing `address` with a chip erase.
    pub fn erase_all(&mut self, address: u64) -> Result<(), FlashError> {
        let _span = self.span.clone().entered();
        let region = self.flash_region(address)?;
        if !region.is_erasable {
            return Err(FlashError::RegionNotErasable {
                address: region.range.start,
            });
        }

        let algorithm = self.prepare(region)?;
        let core_index = region.core_index;
        for sector in region.iter_sectors() {
            self.sectors.remove(&(core_index, sector.base_address));
        }

        let mut flasher = Flasher::new(
            &mut *self.interface,
            region,
            &algorithm,
            &self.options,
            &self.progress,
            &self.cancel,
        );
        let result = flasher.erase_all();
        self.settle(core_index, result)?;

        self.forget_programmed(core_index, &region.range);
        for sector in region.iter_sectors() {
            self.sectors
                .insert((core_index, sector.base_address), SectorState::Erased);
        }
        Ok(())
    }

    /// Programs `data` at `address` into sectors erased earlier in this session.
    ///
    /// Pages the analyzer finds already holding their contents are skipped.
    /// Every other page must lie in sectors of erasable regions that were
    /// erased successfully before, otherwise nothing is programmed.
    pub fn program(&mut self, address: u64, data: &[u8]) -> Result<(), FlashError> {
        let _span = self.span.clone().entered();
        let region = self.flash_region(address)?;
        let mut layout = build_layout(
            region,
            address,
            data,
            self.options.keep_unwritten_bytes && region.is_erasable,
        )?;
        if layout.pages().is_empty() {
            return Ok(());
        }

        let algorithm = self.prepare(region)?;
        self.fill(region, &algorithm, &mut layout)?;
        self.progress.initialized(layout.clone());

        let skip = self.analyze(region, &algorithm, &layout);

        if region.is_erasable {
            for (page, skip) in layout.pages().iter().zip(&skip) {
                if !skip {
                    self.check_erased(region, page)?;
                }
            }
        }

        self.program_pages(region, &algorithm, &layout, &skip)
    }

    /// Erases the sectors covered by `data` and programs it at `address`.
    ///
    /// Sectors whose pages all hold their requested contents already are
    /// neither erased nor programmed. On a non-erasable region the pages are
    /// programmed without erasing.
    pub fn download(&mut self, address: u64, data: &[u8]) -> Result<(), FlashError> {
        let _span = self.span.clone().entered();
        let region = self.flash_region(address)?;
        let mut layout = build_layout(
            region,
            address,
            data,
            self.options.keep_unwritten_bytes && region.is_erasable,
        )?;
        if layout.pages().is_empty() {
            return Ok(());
        }

        let algorithm = self.prepare(region)?;
        self.fill(region, &algorithm, &mut layout)?;
        self.progress.initialized(layout.clone());

        let mut skip = self.analyze(region, &algorithm, &layout);

        if region.is_erasable {
            let changed: Vec<Range<u64>> = layout
                .pages()
                .iter()
                .zip(&skip)
                .filter(|(_, skip)| !**skip)
                .map(|(page, _)| page.address_range())
                .collect();
            let sectors: Vec<SectorInfo> = layout
                .sectors()
                .iter()
                .filter(|sector| touches(&sector.address_range(), &changed))
                .map(|sector| SectorInfo {
                    base_address: sector.address(),
                    size: sector.size(),
                })
                .collect();

            // Erasing wipes the pages of a sector the analyzer found unchanged.
            let erased: Vec<Range<u64>> = sectors.iter().map(SectorInfo::address_range).collect();
            for (page, skip) in layout.pages().iter().zip(skip.iter_mut()) {
                *skip = !touches(&page.address_range(), &erased);
            }

            if !sectors.is_empty() {
                self.erase(region, &sectors)?;
            }
        }

        self.program_pages(region, &algorithm, &layout, &skip)
    }

    /// The flash region at `address`, preferring the halted core's view.
    fn flash_region(&self, address: u64) -> Result<&'session FlashRegion, FlashError> {
        let target: &'session Target = self.target;
        target
            .memory_map
            .find_flash_region(address, Some(self.halted_core))
            .or_else(|| target.memory_map.find_flash_region(address, None))
            .ok_or(FlashError::RegionNotFound { address })
    }

    /// Makes the core owning `region` the halted one and loads its algorithm.
    fn prepare(&mut self, region: &FlashRegion) -> Result<Arc<FlashAlgorithm>, FlashError> {
        let algorithm = region
            .algorithm
            .clone()
            .ok_or(FlashError::NoAlgorithm {
                address: region.range.start,
            })?;

        self.select_core(region.core_index)?;

        let core_index = region.core_index;
        if let Some(loaded) = self.loaded.get(&core_index) {
            if Arc::ptr_eq(loaded, &algorithm) {
                tracing::debug!("Algorithm {} is already loaded", algorithm.name);
                return Ok(algorithm);
            }
        }

        self.loaded.remove(&core_index);
        self.analyzer_loaded.remove(&core_index);
        flasher::load(&mut *self.interface, core_index, &algorithm)?;
        self.loaded.insert(core_index, algorithm.clone());

        Ok(algorithm)
    }

    /// Hands the target over to `core_index` if another core is halted.
    fn select_core(&mut self, core_index: usize) -> Result<(), FlashError> {
        if core_index == self.halted_core {
            return Ok(());
        }

        tracing::info!(
            "Switching from core {} to core {} using {}",
            self.halted_core,
            core_index,
            self.target.driver.name()
        );
        self.target
            .driver
            .prepare_target(&mut *self.interface, core_index)?;
        self.halted_core = core_index;

        // The other cores were reset, whatever they had loaded is gone.
        self.loaded.retain(|core, _| *core == core_index);
        self.analyzer_loaded.retain(|core| *core == core_index);

        Ok(())
    }

    /// Forgets the resident algorithm of `core_index` when `result` left it unusable.
    fn settle<T>(
        &mut self,
        core_index: usize,
        result: Result<T, FlashError>,
    ) -> Result<T, FlashError> {
        if let Err(error) = &result {
            if error.leaves_algorithm_unusable() {
                tracing::warn!(
                    "The algorithm on core {} has to be reloaded: {}",
                    core_index,
                    error
                );
                self.loaded.remove(&core_index);
                self.analyzer_loaded.remove(&core_index);
            }
        }
        result
    }

    fn erase(&mut self, region: &FlashRegion, sectors: &[SectorInfo]) -> Result<(), FlashError> {
        let algorithm = self.prepare(region)?;
        let core_index = region.core_index;

        let states = &mut self.sectors;
        let mut flasher = Flasher::new(
            &mut *self.interface,
            region,
            &algorithm,
            &self.options,
            &self.progress,
            &self.cancel,
        );
        let result = flasher.erase_sectors(sectors, |address, state| {
            states.insert((core_index, address), state);
        });

        for sector in sectors {
            let key = (core_index, sector.base_address);
            if self.sectors.get(&key) == Some(&SectorState::Erased) {
                self.forget_programmed(core_index, &sector.address_range());
            }
        }

        self.settle(core_index, result)
    }

    fn fill(
        &mut self,
        region: &FlashRegion,
        algorithm: &FlashAlgorithm,
        layout: &mut FlashLayout,
    ) -> Result<(), FlashError> {
        if layout.fills().is_empty() {
            return Ok(());
        }

        let mut flasher = Flasher::new(
            &mut *self.interface,
            region,
            algorithm,
            &self.options,
            &self.progress,
            &self.cancel,
        );
        let result = flasher.fill(layout);
        self.settle(region.core_index, result)
    }

    /// Returns for every page of `layout` whether it already holds its contents.
    ///
    /// A failing analyzer is switched off for the rest of the session and
    /// every page is reported as changed.
    fn analyze(
        &mut self,
        region: &FlashRegion,
        algorithm: &FlashAlgorithm,
        layout: &FlashLayout,
    ) -> Vec<bool> {
        let mut skip = vec![false; layout.pages().len()];
        if !self.options.use_analyzer || !self.analyzer_enabled {
            return skip;
        }
        let Some(analyzer_address) = algorithm.analyzer() else {
            return skip;
        };

        let (indices, requests): (Vec<usize>, Vec<u32>) = layout
            .pages()
            .iter()
            .enumerate()
            .filter_map(|(index, page)| {
                encode_request(page.address(), page.size())
                    .map(|request| (index, request))
            })
            .unzip();
        if requests.is_empty() {
            return skip;
        }

        let core_index = region.core_index;
        let needs_load = !self.analyzer_loaded.contains(&core_index);
        let mut flasher = Flasher::new(
            &mut *self.interface,
            region,
            algorithm,
            &self.options,
            &self.progress,
            &self.cancel,
        );
        let result = if needs_load {
            flasher.load_analyzer(analyzer_address)
        } else {
            Ok(())
        }
        .and_then(|()| flasher.compute_crcs(analyzer_address, &requests));

        match self.settle(core_index, result) {
            Ok(crcs) => {
                self.analyzer_loaded.insert(core_index);
                for (index, target_crc) in indices.into_iter().zip(crcs) {
                    let page = &layout.pages()[index];
                    skip[index] = target_crc == crc32(page.data());
                    tracing::debug!(
                        "Page {:#010x}: target crc {:#010x}, unchanged: {}",
                        page.address(),
                        target_crc,
                        skip[index]
                    );
                }
            }
            Err(error) => {
                tracing::warn!(
                    "The analyzer failed, programming every page from now on: {}",
                    error
                );
                self.analyzer_enabled = false;
                self.analyzer_loaded.remove(&core_index);
            }
        }

        skip
    }

    /// True if a page in `range` of `core_index` was programmed since its last erase.
    fn has_programmed(&self, core_index: usize, range: &Range<u64>) -> bool {
        self.programmed
            .iter()
            .any(|(core, page)| *core == core_index && range.contains(page))
    }

    fn forget_programmed(&mut self, core_index: usize, range: &Range<u64>) {
        self.programmed
            .retain(|(core, page)| *core != core_index || !range.contains(page));
    }

    /// Fails unless every sector under `page` was erased in this session and
    /// `page` was not programmed since.
    fn check_erased(&self, region: &FlashRegion, page: &FlashPage) -> Result<(), FlashError> {
        let page_range = page.address_range();
        for sector in region
            .iter_sectors()
            .filter(|sector| sector.address_range().intersects_range(&page_range))
        {
            match self.sectors.get(&(region.core_index, sector.base_address)) {
                Some(SectorState::Erased)
                    if self.programmed.contains(&(region.core_index, page.address())) =>
                {
                    return Err(FlashError::SectorNotErased {
                        address: sector.base_address,
                    });
                }
                Some(SectorState::Erased) => {}
                Some(SectorState::EraseFailed(error_code)) => {
                    return Err(FlashError::EraseFailed {
                        address: sector.base_address,
                        error_code: *error_code,
                    });
                }
                None => {
                    return Err(FlashError::SectorNotErased {
                        address: sector.base_address,
                    });
                }
            }
        }
        Ok(())
    }

    fn program_pages(
        &mut self,
        region: &FlashRegion,
        algorithm: &Arc<FlashAlgorithm>,
        layout: &FlashLayout,
        skip: &[bool],
    ) -> Result<(), FlashError> {
        let mut pages = Vec::with_capacity(layout.pages().len());
        for (page, skip) in layout.pages().iter().zip(skip) {
            if *skip {
                tracing::debug!("Skipping unchanged page {:#010x}", page.address());
                self.progress.page_skipped(page.address(), page.size());
            } else {
                pages.push(page);
            }
        }

        // An erase may have reloaded the algorithm after a failure.
        let algorithm = if pages.is_empty() {
            algorithm.clone()
        } else {
            self.prepare(region)?
        };

        let mut flasher = Flasher::new(
            &mut *self.interface,
            region,
            &algorithm,
            &self.options,
            &self.progress,
            &self.cancel,
        );
        let result = flasher.program(&pages);

        // Pages of a failed or cancelled write need an erase as well.
        if region.is_erasable {
            let core_index = region.core_index;
            self.programmed
                .extend(pages.iter().map(|page| (core_index, page.address())));
        }

        self.settle(region.core_index, result)
    }
}

fn touches(range: &Range<u64>, others: &[Range<u64>]) -> bool {
    others.iter().any(|other| range.intersects_range(other))
}
