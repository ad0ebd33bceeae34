//! Targets built into the crate.

pub mod kl25z;
pub mod nrf5340;

use super::registry::RegistryEntry;

pub(super) fn entries() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry {
            part_number: kl25z::PART_NUMBER,
            aliases: &["KL25Z"],
            factory: kl25z::target,
        },
        RegistryEntry {
            part_number: nrf5340::PART_NUMBER,
            aliases: &["nRF5340"],
            factory: nrf5340::target,
        },
    ]
}
