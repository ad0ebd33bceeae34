mod common;

use std::time::Duration;

use flashmap::flashing::{
    FlashError, FlashOptions, FlashProgress, FlashSession, ProgressEvent, RoutineTimeouts,
};
use flashmap::test::MockTarget;
use flashmap::{Registry, Target};
use pretty_assertions::assert_eq;

const LOAD_ADDRESS: u64 = 0x2000_0000;
const BUFFERS: [u32; 2] = [0x2000_0800, 0x2000_0c00];

fn kl25z() -> Target {
    common::init_logging();
    Registry::builtin().get_target_by_name("KL25Z").unwrap()
}

fn session<'s>(
    mock: &'s mut MockTarget,
    target: &'s Target,
    options: FlashOptions,
) -> FlashSession<'s> {
    FlashSession::new(mock, target, options, tracing::info_span!("kl25z"))
}

fn image_loads(mock: &MockTarget) -> usize {
    mock.writes()
        .iter()
        .filter(|(_, range)| range.start == LOAD_ADDRESS)
        .count()
}

fn first_args(mock: &MockTarget, routine: &str) -> Vec<u32> {
    mock.calls_of(routine)
        .iter()
        .map(|call| call.args[0])
        .collect()
}

#[test]
fn download_one_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);

    session(&mut mock, &target, FlashOptions::default())
        .download(0x1000, &[0xaa; 0x400])
        .unwrap();

    let erases = mock.calls_of("erase_sector");
    assert_eq!(erases.len(), 1);
    assert_eq!(erases[0].args[0], 0x1000);

    let programs = mock.calls_of("program_page");
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].args[..3], [0x1000, 0x400, BUFFERS[0]]);

    let calls = mock.calls();
    let erase_position = calls.iter().position(|c| c.routine == "erase_sector");
    let program_position = calls.iter().position(|c| c.routine == "program_page");
    assert!(erase_position < program_position);

    assert_eq!(mock.memory(0x1000, 0x400), vec![0xaa; 0x400]);
    assert_eq!(mock.memory(0x1400, 4), vec![0xff; 4]);
    assert_eq!(image_loads(&mock), 1);
}

#[test]
fn init_receives_base_and_operation() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    let mut options = FlashOptions::default();
    options.clock = Some(48_000_000);

    session(&mut mock, &target, options)
        .download(0x1000, &[0xaa; 0x10])
        .unwrap();

    let operations: Vec<u32> = mock
        .calls_of("init")
        .iter()
        .map(|call| {
            assert_eq!(call.args[..2], [0, 48_000_000]);
            call.args[2]
        })
        .collect();
    assert_eq!(operations, vec![1, 2]);
}

#[test]
fn double_buffering_alternates_buffers() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.set_program_polls(5);

    let data: Vec<u8> = (0..0x1000).map(|i| i as u8).collect();
    session(&mut mock, &target, FlashOptions::default())
        .download(0, &data)
        .unwrap();

    let buffers: Vec<u32> = mock
        .calls_of("program_page")
        .iter()
        .map(|call| call.args[2])
        .collect();
    assert_eq!(
        buffers,
        vec![BUFFERS[0], BUFFERS[1], BUFFERS[0], BUFFERS[1]]
    );
    assert_eq!(mock.buffer_violations(), &[]);
    assert_eq!(mock.memory(0, 0x1000), data);
}

#[test]
fn single_buffer_when_double_buffering_is_off() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    let mut options = FlashOptions::default();
    options.double_buffering = false;

    session(&mut mock, &target, options)
        .download(0, &[0x5a; 0xc00])
        .unwrap();

    let buffers: Vec<u32> = mock
        .calls_of("program_page")
        .iter()
        .map(|call| call.args[2])
        .collect();
    assert_eq!(buffers, vec![BUFFERS[0]; 3]);
}

#[test]
fn analyzer_skips_unchanged_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.set_flash(0x1000, &[0xaa; 0x400]);
    let (progress, events) = common::recorder();

    session(&mut mock, &target, FlashOptions::default())
        .with_progress(progress)
        .download(0x1000, &[0xaa; 0x400])
        .unwrap();

    assert_eq!(mock.calls_of("analyzer").len(), 1);
    assert!(mock.calls_of("erase_sector").is_empty());
    assert!(mock.calls_of("program_page").is_empty());
    let events = events.lock().unwrap();
    assert!(events.iter().any(|event| matches!(
        event,
        ProgressEvent::PageSkipped {
            address: 0x1000,
            size: 0x400
        }
    )));
}

#[test]
fn analyzer_programs_changed_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.set_flash(0x1000, &[0xaa; 0x400]);
    mock.set_flash(0x1400, &[0xaa; 0x400]);

    let mut data = vec![0xaa; 0x800];
    data[0x500] = 0x00;
    session(&mut mock, &target, FlashOptions::default())
        .download(0x1000, &data)
        .unwrap();

    let erased = first_args(&mock, "erase_sector");
    assert_eq!(erased, vec![0x1400]);
    let programmed = first_args(&mock, "program_page");
    assert_eq!(programmed, vec![0x1400]);
    assert_eq!(mock.memory(0x1000, 0x800), data);
}

#[test]
fn analyzer_fault_disables_analyzer() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.fault_analyzer();
    mock.set_flash(0x1000, &[0xaa; 0x400]);

    let mut session = session(&mut mock, &target, FlashOptions::default());
    session.download(0x1000, &[0xaa; 0x400]).unwrap();
    assert!(!session.analyzer_enabled());
    session.download(0x2000, &[0xbb; 0x400]).unwrap();
    drop(session);

    assert_eq!(mock.calls_of("analyzer").len(), 1);
    assert_eq!(mock.calls_of("program_page").len(), 2);
    assert_eq!(mock.memory(0x1000, 0x400), vec![0xaa; 0x400]);
}

#[test]
fn program_requires_erased_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target, FlashOptions::default());
    let result = session.program(0x1000, &[0x12; 0x400]);
    assert!(matches!(result, Err(FlashError::SectorNotErased { address: 0x1000 })));

    session.erase_sectors(0x1000..0x1400).unwrap();
    assert!(session.is_sector_erased(0x1200));
    assert!(!session.is_sector_erased(0x1400));
    session.program(0x1000, &[0x12; 0x400]).unwrap();
    drop(session);

    assert_eq!(mock.calls_of("program_page").len(), 1);
    assert_eq!(mock.memory(0x1000, 0x400), vec![0x12; 0x400]);
}

#[test]
fn programmed_sector_needs_new_erase() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target, FlashOptions::default());
    session.erase_sectors(0x1000..0x1400).unwrap();
    session.program(0x1000, &[0x12; 0x400]).unwrap();
    assert!(!session.is_sector_erased(0x1000));

    let result = session.program(0x1000, &[0x34; 0x400]);
    assert!(matches!(result, Err(FlashError::SectorNotErased { address: 0x1000 })));

    session.erase_sectors(0x1000..0x1400).unwrap();
    assert!(session.is_sector_erased(0x1000));
    session.program(0x1000, &[0x34; 0x400]).unwrap();
    drop(session);

    assert_eq!(mock.calls_of("erase_sector").len(), 2);
    assert_eq!(mock.calls_of("program_page").len(), 2);
    assert_eq!(mock.memory(0x1000, 0x400), vec![0x34; 0x400]);
}

#[test]
fn uninit_failure_is_not_fatal() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.fail_uninit(9);

    session(&mut mock, &target, FlashOptions::default())
        .download(0x1000, &[0x55; 0x400])
        .unwrap();

    assert!(!mock.calls_of("uninit").is_empty());
    assert_eq!(mock.calls_of("program_page").len(), 1);
    assert_eq!(mock.memory(0x1000, 0x400), vec![0x55; 0x400]);
}

#[test]
fn erase_failure_is_reported_per_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.fail_erase(0x1400, 5);
    let (progress, events) = common::recorder();

    let mut session = session(&mut mock, &target, FlashOptions::default())
        .with_progress(progress);
    let result = session.download(0x1000, &[0x33; 0xc00]);
    assert!(matches!(
        result,
        Err(FlashError::EraseFailed { address: 0x1400, error_code: 5 })
    ));
    assert!(session.is_sector_erased(0x1000));
    assert!(!session.is_sector_erased(0x1400));
    assert!(session.is_sector_erased(0x1800));

    let result = session.program(0x1400, &[0x33; 0x400]);
    assert!(matches!(
        result,
        Err(FlashError::EraseFailed { address: 0x1400, error_code: 5 })
    ));
    session.program(0x1000, &[0x33; 0x400]).unwrap();
    drop(session);

    let erased = first_args(&mock, "erase_sector");
    assert_eq!(erased, vec![0x1000, 0x1400, 0x1800]);
    let programmed = first_args(&mock, "program_page");
    assert_eq!(programmed, vec![0x1000]);

    let events = events.lock().unwrap();
    assert!(events.iter().any(|event| matches!(
        event,
        ProgressEvent::SectorEraseFailed { address: 0x1400, error_code: 5 }
    )));
    assert!(events.iter().any(|event| matches!(event, ProgressEvent::FailedErasing)));
}

#[test]
fn program_failure_reports_page() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.fail_program(0x400, 7);

    let result = session(&mut mock, &target, FlashOptions::default())
        .download(0, &[0x44; 0xc00]);
    assert!(matches!(
        result,
        Err(FlashError::ProgramFailed { address: 0x400, error_code: 7 })
    ));

    let programmed = first_args(&mock, "program_page");
    assert_eq!(programmed, vec![0, 0x400]);
}

#[test]
fn init_failure() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.fail_init(3);

    let result = session(&mut mock, &target, FlashOptions::default())
        .download(0x1000, &[1; 4]);
    assert!(matches!(
        result,
        Err(FlashError::AlgorithmInitFailed { address: 0, error_code: 3 })
    ));
    assert!(mock.calls_of("erase_sector").is_empty());
}

#[test]
fn hung_routine_forces_reload() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.hang_once("program_page");

    let mut options = FlashOptions::default();
    options.timeouts = RoutineTimeouts::uniform(Duration::from_millis(50));

    let mut session = session(&mut mock, &target, options);
    let result = session.download(0x1000, &[0x66; 0x400]);
    assert!(matches!(
        result,
        Err(FlashError::AlgorithmHung { routine: "program_page", .. })
    ));

    session.download(0x1000, &[0x66; 0x400]).unwrap();
    drop(session);

    assert_eq!(image_loads(&mock), 2);
    assert!(mock.halts().len() >= 3);
    assert_eq!(mock.memory(0x1000, 0x400), vec![0x66; 0x400]);
}

#[test]
fn corrupted_image_is_detected() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.corrupt_next_read(LOAD_ADDRESS + 0x10);

    let result = session(&mut mock, &target, FlashOptions::default())
        .download(0x1000, &[1; 4]);
    assert!(matches!(
        result,
        Err(FlashError::AlgorithmNotLoaded { address }) if address == LOAD_ADDRESS + 0x10
    ));
    assert!(mock.calls().is_empty());
}

#[test]
fn keep_unwritten_bytes_restores_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.set_flash(0x1000, &[0x11; 0x400]);

    let mut options = FlashOptions::default();
    options.keep_unwritten_bytes = true;
    session(&mut mock, &target, options)
        .download(0x1100, &[0x22; 0x100])
        .unwrap();

    let mut expected = vec![0x11; 0x400];
    expected[0x100..0x200].fill(0x22);
    assert_eq!(mock.memory(0x1000, 0x400), expected);
    assert_eq!(mock.calls_of("init")[0].args[2], 3);
}

#[test]
fn cancel_waits_for_running_page() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);

    let session = session(&mut mock, &target, FlashOptions::default());
    let handle = session.cancel_handle();
    let mut session = session.with_progress(FlashProgress::new(move |event| {
        if matches!(event, ProgressEvent::PageProgrammed { .. }) {
            handle.cancel();
        }
    }));

    let result = session.download(0, &[0x77; 0x1000]);
    assert!(matches!(result, Err(FlashError::Cancelled)));
    drop(session);

    assert_eq!(mock.calls_of("program_page").len(), 2);
    assert_eq!(mock.memory(0, 0x800), vec![0x77; 0x800]);
    assert_eq!(mock.memory(0x800, 0x800), vec![0xff; 0x800]);
    assert_eq!(mock.buffer_violations(), &[]);
}

#[test]
fn erase_all_marks_every_sector() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);
    mock.set_flash(0x1_f000, &[0; 4]);

    let mut session = session(&mut mock, &target, FlashOptions::default());
    session.erase_all(0).unwrap();
    assert!(session.is_sector_erased(0x1_fc00));

    let mut data = [0; 4];
    session.read(0x1_f000, &mut data).unwrap();
    assert_eq!(data, [0xff; 4]);
    drop(session);

    assert_eq!(mock.calls_of("erase_all").len(), 1);
}

#[test]
fn address_outside_flash() {
    let target = kl25z();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target, FlashOptions::default());
    assert!(matches!(
        session.download(0x3000_0000, &[0; 4]),
        Err(FlashError::RegionNotFound { address: 0x3000_0000 })
    ));
    assert!(matches!(
        session.download(0x1_fffc, &[0; 8]),
        Err(FlashError::AddressNotInRegion { .. })
    ));
}
