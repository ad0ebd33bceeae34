use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use flashmap_target::{FlashAlgorithm, FlashRegion, SectorInfo};
use tracing::Level;

use super::analyzer::ANALYZER;
use super::{CancelHandle, FlashError, FlashLayout, FlashOptions, FlashPage, FlashProgress};
use crate::interface::{CoreRegister, CoreStatus, HaltReason, TargetInterface};

pub(super) trait Operation {
    fn operation() -> u32;
    fn operation_name() -> &'static str {
        match Self::operation() {
            1 => "Erase",
            2 => "Program",
            3 => "Verify",
            _ => "Unknown Operation",
        }
    }
}

pub(super) struct Erase;

impl Operation for Erase {
    fn operation() -> u32 {
        1
    }
}

pub(super) struct Program;

impl Operation for Program {
    fn operation() -> u32 {
        2
    }
}

pub(super) struct Verify;

impl Operation for Verify {
    fn operation() -> u32 {
        3
    }
}

/// What a session remembers about a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SectorState {
    Erased,
    EraseFailed(u32),
}

/// Writes the algorithm image to target RAM and verifies it by reading it back.
pub(super) fn load(
    interface: &mut dyn TargetInterface,
    core_index: usize,
    algorithm: &FlashAlgorithm,
) -> Result<(), FlashError> {
    tracing::debug!("Halting core {}", core_index);
    interface.halt(core_index)?;

    let span = tracing::debug_span!(
        "Loading algorithm into RAM",
        name = %algorithm.name,
        address = algorithm.load_address
    )
    .entered();

    let address = algorithm.load_address;
    let image = &algorithm.instructions;
    interface.write_memory(core_index, address, image)?;

    let mut data = vec![0; image.len()];
    interface.read_memory(core_index, address, &mut data)?;

    drop(span);

    if let Some(offset) = image
        .iter()
        .zip(data.iter())
        .position(|(original, read_back)| original != read_back)
    {
        let address = address + offset as u64;
        tracing::error!(
            "Failed to verify flash algorithm. Data mismatch at address {:#010x}",
            address
        );
        return Err(FlashError::AlgorithmNotLoaded { address });
    }

    tracing::debug!("RAM contents match flashing algo blob.");

    Ok(())
}

/// Drives the routines of one loaded flash algorithm for one flash region.
pub(super) struct Flasher<'a> {
    interface: &'a mut dyn TargetInterface,
    region: &'a FlashRegion,
    algorithm: &'a FlashAlgorithm,
    options: &'a FlashOptions,
    progress: &'a FlashProgress,
    cancel: &'a CancelHandle,
}

impl<'a> Flasher<'a> {
    pub(super) fn new(
        interface: &'a mut dyn TargetInterface,
        region: &'a FlashRegion,
        algorithm: &'a FlashAlgorithm,
        options: &'a FlashOptions,
        progress: &'a FlashProgress,
        cancel: &'a CancelHandle,
    ) -> Self {
        Self {
            interface,
            region,
            algorithm,
            options,
            progress,
            cancel,
        }
    }

    fn core_index(&self) -> usize {
        self.region.core_index
    }

    pub(super) fn double_buffering_supported(&self) -> bool {
        self.algorithm.supports_double_buffering()
    }

    fn init<O: Operation>(&mut self) -> Result<ActiveFlasher<'_, 'a, O>, FlashError> {
        tracing::debug!("Preparing Flasher for operation {}", O::operation_name());
        let mut active = ActiveFlasher::<O> {
            flasher: self,
            _operation: PhantomData,
        };

        active.init()?;

        Ok(active)
    }

    /// Runs `f` between `Init()` and `UnInit()` of operation `O`.
    ///
    /// `UnInit()` is skipped when `f` left the algorithm in an unusable state.
    fn run<O: Operation, T>(
        &mut self,
        f: impl FnOnce(&mut ActiveFlasher<'_, 'a, O>) -> Result<T, FlashError>,
    ) -> Result<T, FlashError> {
        let mut active = self.init::<O>()?;
        let result = f(&mut active);
        if let Err(error) = &result {
            if error.leaves_algorithm_unusable() {
                return result;
            }
        }
        active.uninit()?;
        result
    }

    /// Erases `sectors` one by one.
    ///
    /// A sector the algorithm fails to erase is recorded and reported, and
    /// erasing continues with the next sector. The first such failure is
    /// returned once all sectors were attempted.
    pub(super) fn erase_sectors(
        &mut self,
        sectors: &[SectorInfo],
        mut record: impl FnMut(u64, SectorState),
    ) -> Result<(), FlashError> {
        self.progress.started_erasing();

        let result = self.run::<Erase, _>(|active| {
            let mut first_failure = None;
            for sector in sectors {
                if active.flasher.cancel.is_cancelled() {
                    return Err(FlashError::Cancelled);
                }

                let t = Instant::now();
                match active.erase_sector(sector.base_address) {
                    Ok(()) => {
                        record(sector.base_address, SectorState::Erased);
                        active
                            .flasher
                            .progress
                            .sector_erased(sector.base_address, sector.size, t.elapsed());
                    }
                    Err(FlashError::EraseFailed {
                        address,
                        error_code,
                    }) => {
                        tracing::warn!(
                            "Erasing sector {:#010x} failed with code {}",
                            address,
                            error_code
                        );
                        record(address, SectorState::EraseFailed(error_code));
                        active
                            .flasher
                            .progress
                            .sector_erase_failed(address, error_code);
                        first_failure.get_or_insert(FlashError::EraseFailed {
                            address,
                            error_code,
                        });
                    }
                    Err(other) => return Err(other),
                }
            }
            first_failure.map_or(Ok(()), Err)
        });

        if result.is_ok() {
            self.progress.finished_erasing();
        } else {
            self.progress.failed_erasing();
        }

        result
    }

    /// Erases the whole region with `EraseAll()`.
    pub(super) fn erase_all(&mut self) -> Result<(), FlashError> {
        self.progress.started_erasing();

        let result = self.run::<Erase, _>(|active| active.erase_all());

        if result.is_ok() {
            self.progress.finished_erasing();
        } else {
            self.progress.failed_erasing();
        }

        result
    }

    /// Reads the current flash contents into the fill areas of `layout`.
    pub(super) fn fill(&mut self, layout: &mut FlashLayout) -> Result<(), FlashError> {
        let fills = layout.fills().to_vec();
        if fills.is_empty() {
            return Ok(());
        }

        self.run::<Verify, _>(|active| {
            for fill in fills {
                let page = &mut layout.pages_mut()[fill.page_index()];
                let offset = (fill.address() - page.address()) as usize;
                let slice = &mut page.data_mut()[offset..offset + fill.size() as usize];
                let core_index = active.flasher.core_index();
                active
                    .flasher
                    .interface
                    .read_memory(core_index, fill.address(), slice)?;
            }
            Ok(())
        })
    }

    /// Programs `pages` into the flash.
    pub(super) fn program(&mut self, pages: &[&FlashPage]) -> Result<(), FlashError> {
        if pages.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "Double Buffering enabled: {:?}",
            self.options.double_buffering
        );
        if self.double_buffering_supported() && self.options.double_buffering {
            self.program_double_buffer(pages)
        } else {
            self.program_simple(pages)
        }
    }

    /// Programs the pages one after the other through the first page buffer.
    fn program_simple(&mut self, pages: &[&FlashPage]) -> Result<(), FlashError> {
        self.progress.started_programming();

        let result = self.run::<Program, _>(|active| {
            for page in pages {
                if active.flasher.cancel.is_cancelled() {
                    return Err(FlashError::Cancelled);
                }

                active.program_page(page.address(), page.data())?;
            }
            Ok(())
        });

        if result.is_ok() {
            self.progress.finished_programming();
        } else {
            self.progress.failed_programming();
        }

        result
    }

    /// Flash a program using double buffering.
    ///
    /// This uses two buffers to increase the flash speed.
    /// While the data from one buffer is programmed, the
    /// data for the next page is already downloaded
    /// into the next buffer.
    ///
    /// A buffer is only written again after the program call reading it has
    /// returned.
    fn program_double_buffer(&mut self, pages: &[&FlashPage]) -> Result<(), FlashError> {
        let mut current_buf = 0;
        self.progress.started_programming();

        let result = self.run::<Program, _>(|active| {
            let mut pending: Option<PendingPage> = None;

            for page in pages {
                if active.flasher.cancel.is_cancelled() {
                    if let Some(pending) = pending.take() {
                        active.finish_page(pending)?;
                    }
                    return Err(FlashError::Cancelled);
                }

                // The buffer was last used two pages ago, and that call has been awaited.
                active.load_page_buffer(page.data(), current_buf)?;

                // Then wait for the active RAM -> Flash copy process to finish.
                if let Some(pending) = pending.take() {
                    active.finish_page(pending)?;
                }

                // Start the next copy process.
                active.start_program_page_with_buffer(page.address(), page.size(), current_buf)?;
                pending = Some(PendingPage {
                    address: page.address(),
                    size: page.size(),
                    started: Instant::now(),
                });

                // Swap the buffers
                current_buf = 1 - current_buf;
            }

            if let Some(pending) = pending.take() {
                active.finish_page(pending)?;
            }

            Ok(())
        });

        if result.is_ok() {
            self.progress.finished_programming();
        } else {
            self.progress.failed_programming();
        }

        result
    }

    /// Writes the analyzer routine to target RAM.
    pub(super) fn load_analyzer(&mut self, analyzer_address: u64) -> Result<(), FlashError> {
        tracing::debug!("Loading analyzer to {:#010x}", analyzer_address);
        let image = flashmap_target::instructions_from_words(&ANALYZER);
        let core_index = self.core_index();
        self.interface
            .write_memory(core_index, analyzer_address, &image)?;
        Ok(())
    }

    /// Lets the analyzer compute the CRC32 of each encoded request.
    pub(super) fn compute_crcs(
        &mut self,
        analyzer_address: u64,
        requests: &[u32],
    ) -> Result<Vec<u32>, FlashError> {
        let core_index = self.core_index();
        let begin_data = self.algorithm.begin_data;
        let per_call = (self.region.page_size() / 4).max(1) as usize;

        let mut crcs = Vec::with_capacity(requests.len());
        for chunk in requests.chunks(per_call) {
            let bytes: Vec<u8> = chunk.iter().flat_map(|r| r.to_le_bytes()).collect();
            self.interface.write_memory(core_index, begin_data, &bytes)?;

            let result = self.call_function_and_wait(
                &Registers {
                    pc: into_reg(analyzer_address)?,
                    r0: Some(into_reg(begin_data)?),
                    r1: Some(chunk.len() as u32),
                    r2: None,
                    r3: None,
                },
                true,
                "analyzer",
                self.options.timeouts.analyzer,
            )?;
            if result != 0 {
                return Err(FlashError::RoutineCallFailed {
                    name: "analyzer",
                    error_code: result,
                });
            }

            let mut data = vec![0; bytes.len()];
            self.interface
                .read_memory(core_index, begin_data, &mut data)?;
            crcs.extend(
                data.chunks_exact(4)
                    .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
        }

        Ok(crcs)
    }

    fn call_function_and_wait(
        &mut self,
        registers: &Registers,
        init: bool,
        routine: &'static str,
        timeout: Duration,
    ) -> Result<u32, FlashError> {
        self.call_function(registers, init)?;
        self.wait_for_completion(routine, timeout)
    }

    fn call_function(&mut self, registers: &Registers, init: bool) -> Result<(), FlashError> {
        tracing::debug!("Calling routine {:?}, init={}", &registers, init);

        let algo = self.algorithm;
        let core_index = self.core_index();

        let registers = [
            (CoreRegister::Pc, Some(registers.pc & !1)),
            (CoreRegister::R0, registers.r0),
            (CoreRegister::R1, registers.r1),
            (CoreRegister::R2, registers.r2),
            (CoreRegister::R3, registers.r3),
            (
                CoreRegister::R9,
                if init {
                    Some(into_reg(algo.static_base)?)
                } else {
                    None
                },
            ),
            (
                CoreRegister::Sp,
                if init {
                    Some(into_reg(algo.begin_stack)?)
                } else {
                    None
                },
            ),
            // The blob starts with a breakpoint. Returning there in Thumb mode halts the core.
            (CoreRegister::Lr, Some(into_reg(algo.load_address | 1)?)),
        ];

        for (register, value) in registers {
            if let Some(v) = value {
                self.interface.set_register(core_index, register, v)?;

                if tracing::enabled!(Level::TRACE) {
                    let value = self.interface.read_register(core_index, register)?;
                    tracing::trace!(
                        "content of {}: {:#010x} should be: {:#010x}",
                        register.name(),
                        value,
                        v
                    );
                }
            }
        }

        // Resume target operation.
        self.interface.run(core_index)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn wait_for_completion(
        &mut self,
        routine: &'static str,
        timeout: Duration,
    ) -> Result<u32, FlashError> {
        tracing::debug!("Waiting for routine call completion.");
        let core_index = self.core_index();

        // Wait until halted state is active again.
        let start = Instant::now();

        loop {
            match self.interface.status(core_index)? {
                status @ (CoreStatus::Halted(HaltReason::Exception) | CoreStatus::LockedUp) => {
                    tracing::error!("Routine {} ended in {:?}", routine, status);
                    return Err(FlashError::RoutineFault { routine, status });
                }
                CoreStatus::Halted(_) => break,
                _ => {
                    // All other statuses are okay: we'll just keep polling.
                }
            }

            if start.elapsed() >= timeout {
                tracing::error!("Routine {} did not return within {:?}", routine, timeout);
                if let Err(error) = self.interface.halt(core_index) {
                    tracing::warn!("Halting the hung core failed: {}", error);
                }
                return Err(FlashError::AlgorithmHung { routine, timeout });
            }

            std::thread::sleep(Duration::from_millis(1));
        }

        let r = self
            .interface
            .read_register(core_index, CoreRegister::result())?;
        Ok(r)
    }
}

struct Registers {
    pc: u32,
    r0: Option<u32>,
    r1: Option<u32>,
    r2: Option<u32>,
    r3: Option<u32>,
}

impl Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}({:?}, {:?}, {:?}, {:?}",
            self.pc, self.r0, self.r1, self.r2, self.r3
        )
    }
}

fn into_reg(val: u64) -> Result<u32, FlashError> {
    let reg_value: u32 = val
        .try_into()
        .map_err(|_| FlashError::RegisterValueNotSupported(val))?;

    Ok(reg_value)
}

/// A program call that was started but not awaited yet.
struct PendingPage {
    address: u64,
    size: u64,
    started: Instant,
}

/// A flasher between `Init()` and `UnInit()` of operation `O`.
pub(super) struct ActiveFlasher<'f, 'a, O: Operation> {
    flasher: &'f mut Flasher<'a>,
    _operation: PhantomData<O>,
}

impl<O: Operation> ActiveFlasher<'_, '_, O> {
    #[tracing::instrument(name = "Call to flash algorithm init", skip(self))]
    fn init(&mut self) -> Result<(), FlashError> {
        let flasher = &mut *self.flasher;
        let address = flasher.region.range.start;

        let result = flasher.call_function_and_wait(
            &Registers {
                pc: into_reg(flasher.algorithm.pc_init)?,
                r0: Some(into_reg(address)?),
                r1: Some(flasher.options.clock.unwrap_or(0)),
                r2: Some(O::operation()),
                r3: None,
            },
            true,
            "init",
            flasher.options.timeouts.init,
        )?;

        if result != 0 {
            return Err(FlashError::AlgorithmInitFailed {
                address,
                error_code: result,
            });
        }

        Ok(())
    }

    fn uninit(&mut self) -> Result<(), FlashError> {
        let flasher = &mut *self.flasher;
        let Some(pc_uninit) = flasher.algorithm.pc_uninit else {
            return Ok(());
        };

        tracing::debug!("Running uninit routine.");
        let result = flasher.call_function_and_wait(
            &Registers {
                pc: into_reg(pc_uninit)?,
                r0: Some(O::operation()),
                r1: None,
                r2: None,
                r3: None,
            },
            false,
            "uninit",
            flasher.options.timeouts.uninit,
        )?;

        if result != 0 {
            tracing::warn!(
                "Uninit of operation {} returned {}",
                O::operation_name(),
                result
            );
        }

        Ok(())
    }
}

impl ActiveFlasher<'_, '_, Erase> {
    fn erase_all(&mut self) -> Result<(), FlashError> {
        tracing::debug!("Erasing entire region.");
        let flasher = &mut *self.flasher;
        let address = flasher.region.range.start;

        let result = flasher.call_function_and_wait(
            &Registers {
                pc: into_reg(flasher.algorithm.pc_erase_all)?,
                r0: None,
                r1: None,
                r2: None,
                r3: None,
            },
            false,
            "erase_all",
            flasher.options.timeouts.erase_all,
        )?;

        if result != 0 {
            Err(FlashError::EraseFailed {
                address,
                error_code: result,
            })
        } else {
            Ok(())
        }
    }

    fn erase_sector(&mut self, address: u64) -> Result<(), FlashError> {
        tracing::info!("Erasing sector at address {:#010x}", address);
        let t1 = Instant::now();
        let flasher = &mut *self.flasher;

        let result = flasher.call_function_and_wait(
            &Registers {
                pc: into_reg(flasher.algorithm.pc_erase_sector)?,
                r0: Some(into_reg(address)?),
                r1: None,
                r2: None,
                r3: None,
            },
            false,
            "erase_sector",
            flasher.options.timeouts.erase_sector,
        )?;
        tracing::info!(
            "Done erasing sector. Result is {}. This took {:?}",
            result,
            t1.elapsed()
        );

        if result != 0 {
            Err(FlashError::EraseFailed {
                address,
                error_code: result,
            })
        } else {
            Ok(())
        }
    }
}

impl ActiveFlasher<'_, '_, Program> {
    fn program_page(&mut self, address: u64, bytes: &[u8]) -> Result<(), FlashError> {
        let t1 = Instant::now();

        tracing::info!(
            "Flashing page at address {:#010x} with size: {}",
            address,
            bytes.len()
        );

        self.load_page_buffer(bytes, 0)?;
        self.start_program_page_with_buffer(address, bytes.len() as u64, 0)?;
        self.finish_page(PendingPage {
            address,
            size: bytes.len() as u64,
            started: t1,
        })?;

        tracing::info!("Flashing took: {:?}", t1.elapsed());
        Ok(())
    }

    fn start_program_page_with_buffer(
        &mut self,
        address: u64,
        size: u64,
        buffer_number: usize,
    ) -> Result<(), FlashError> {
        let flasher = &mut *self.flasher;

        // Ensure the buffer number is valid, otherwise there is a bug somewhere
        // in the flashing code.
        assert!(
            buffer_number < flasher.algorithm.page_buffers.len(),
            "Trying to use non-existing buffer ({}/{}) for flashing. This is a bug. Please report it.",
            buffer_number,
            flasher.algorithm.page_buffers.len()
        );

        flasher.call_function(
            &Registers {
                pc: into_reg(flasher.algorithm.pc_program_page)?,
                r0: Some(into_reg(address)?),
                r1: Some(into_reg(size)?),
                r2: Some(into_reg(flasher.algorithm.page_buffers[buffer_number])?),
                r3: None,
            },
            false,
        )
    }

    /// Waits for a started program call and checks its result.
    fn finish_page(&mut self, pending: PendingPage) -> Result<(), FlashError> {
        let flasher = &mut *self.flasher;
        let result =
            flasher.wait_for_completion("program_page", flasher.options.timeouts.program_page)?;

        if result != 0 {
            return Err(FlashError::ProgramFailed {
                address: pending.address,
                error_code: result,
            });
        }

        flasher
            .progress
            .page_programmed(pending.address, pending.size, pending.started.elapsed());
        Ok(())
    }

    fn load_page_buffer(&mut self, bytes: &[u8], buffer_number: usize) -> Result<(), FlashError> {
        let flasher = &mut *self.flasher;

        // Ensure the buffer number is valid, otherwise there is a bug somewhere
        // in the flashing code.
        assert!(
            buffer_number < flasher.algorithm.page_buffers.len(),
            "Trying to use non-existing buffer ({}/{}) for flashing. This is a bug. Please report it.",
            buffer_number,
            flasher.algorithm.page_buffers.len()
        );

        let t1 = Instant::now();
        let core_index = flasher.core_index();
        let buffer = flasher.algorithm.page_buffers[buffer_number];
        flasher.interface.write_memory(core_index, buffer, bytes)?;

        tracing::debug!(
            "Took {:?} to download {} byte page into ram",
            t1.elapsed(),
            bytes.len()
        );

        Ok(())
    }
}
