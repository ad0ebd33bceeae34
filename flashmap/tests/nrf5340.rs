mod common;

use flashmap::flashing::{FlashError, FlashOptions, FlashSession};
use flashmap::target::builtin::nrf5340::{APPLICATION_CORE, NETWORK_CORE};
use flashmap::test::MockTarget;
use flashmap::{Registry, Target};
use pretty_assertions::assert_eq;

fn nrf5340() -> Target {
    common::init_logging();
    Registry::builtin().get_target_by_name("nRF5340_xxAA").unwrap()
}

fn session<'s>(mock: &'s mut MockTarget, target: &'s Target) -> FlashSession<'s> {
    FlashSession::new(
        mock,
        target,
        FlashOptions::default(),
        tracing::info_span!("nrf5340"),
    )
}

fn first_args(mock: &MockTarget, routine: &str) -> Vec<u32> {
    mock.calls_of(routine)
        .iter()
        .map(|call| call.args[0])
        .collect()
}

#[test]
fn switching_cores_prepares_target_once() {
    let target = nrf5340();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target);
    assert_eq!(session.halted_core(), APPLICATION_CORE);

    session.download(0x0100_0000, &[0x55; 0x800]).unwrap();
    assert_eq!(session.halted_core(), NETWORK_CORE);
    session.download(0x0100_0800, &[0x66; 0x800]).unwrap();
    drop(session);

    // Preparing the network core holds the application core in reset.
    assert_eq!(mock.resets(), &[APPLICATION_CORE]);
    assert!(mock
        .calls()
        .iter()
        .all(|call| call.core_index == NETWORK_CORE && call.algorithm == "nrf5340_net"));

    let erased = first_args(&mock, "erase_sector");
    assert_eq!(erased, vec![0x0100_0000, 0x0100_0800]);
    assert_eq!(mock.memory(0x0100_0000, 0x800), vec![0x55; 0x800]);
    assert_eq!(mock.memory(0x0100_0800, 0x800), vec![0x66; 0x800]);
}

#[test]
fn switching_back_resets_the_other_core() {
    let target = nrf5340();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target);
    session.download(0x0, &[0x01; 0x1000]).unwrap();
    session.download(0x0100_0000, &[0x02; 0x800]).unwrap();
    session.download(0x1000, &[0x03; 0x1000]).unwrap();
    drop(session);

    assert_eq!(mock.resets(), &[APPLICATION_CORE, NETWORK_CORE]);

    // The application algorithm does not survive the reset of its core.
    let app_loads = mock
        .writes()
        .iter()
        .filter(|(core, range)| *core == APPLICATION_CORE && range.start == 0x2000_0000)
        .count();
    assert_eq!(app_loads, 2);

    let programs: Vec<(usize, u32, u32)> = mock
        .calls_of("program_page")
        .iter()
        .map(|call| (call.core_index, call.args[0], call.args[2]))
        .collect();
    assert_eq!(
        programs,
        vec![
            (APPLICATION_CORE, 0x0, 0x2000_0540),
            (NETWORK_CORE, 0x0100_0000, 0x2100_0550),
            (APPLICATION_CORE, 0x1000, 0x2000_0540),
        ]
    );
}

#[test]
fn init_passes_region_base() {
    let target = nrf5340();
    let mut mock = MockTarget::new(&target);

    session(&mut mock, &target)
        .download(0x0100_0000, &[0x55; 0x10])
        .unwrap();

    let bases = first_args(&mock, "init");
    assert_eq!(bases, vec![0x0100_0000, 0x0100_0000]);
    // Every init is paired with an uninit passing the operation.
    let operations = first_args(&mock, "uninit");
    assert_eq!(operations, vec![1, 2]);
}

#[test]
fn uicr_is_programmed_without_erase() {
    let target = nrf5340();
    let mut mock = MockTarget::new(&target);

    let mut session = session(&mut mock, &target);
    assert!(matches!(
        session.erase_sectors(0x01ff_8000..0x01ff_8800),
        Err(FlashError::RegionNotErasable { address: 0x01ff_8000 })
    ));

    session.program(0x01ff_8000, &[0x12; 0x20]).unwrap();
    session.download(0x0100_0000, &[0x34; 0x800]).unwrap();
    drop(session);

    let algorithms: Vec<&str> = mock
        .calls_of("program_page")
        .iter()
        .map(|call| call.algorithm.as_str())
        .collect();
    assert_eq!(algorithms, vec!["nrf5340_net_uicr", "nrf5340_net"]);
    assert_eq!(mock.calls_of("erase_sector").len(), 1);

    let mut expected = vec![0x12; 0x20];
    expected.resize(0x800, 0xff);
    assert_eq!(mock.memory(0x01ff_8000, 0x800), expected);

    let net_loads = mock
        .writes()
        .iter()
        .filter(|(_, range)| range.start == 0x2100_0000)
        .count();
    assert_eq!(net_loads, 2);
    assert_eq!(mock.resets(), &[APPLICATION_CORE]);
}
