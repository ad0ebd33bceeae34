//! On-target CRC32 of flash pages.
//!
//! The analyzer is a small routine loaded next to the flash algorithm. It is
//! given a list of `(address, size)` requests encoded as one word each and
//! replaces every request with the CRC32 of that flash area, which is then
//! compared with the CRC32 of the data about to be programmed.

/// The position independent CRC32 routine. It builds its lookup table right
/// after the code, so it needs [`ANALYZER_RESERVED_SIZE`](flashmap_target::ANALYZER_RESERVED_SIZE) bytes.
pub(crate) const ANALYZER: [u32; 49] = [
    0x2780b5f0, 0x25004684, 0x4e2b2401, 0x447e4a2b, 0x0023007f, 0x425b402b, 0x40130868, 0x08584043,
    0x425b4023, 0x40584013, 0x40200843, 0x40104240, 0x08434058, 0x42404020, 0x40584010, 0x40200843,
    0x40104240, 0x08434058, 0x42404020, 0x40584010, 0x40200843, 0x40104240, 0x08584043, 0x425b4023,
    0x40434013, 0xc6083501, 0xd1d242bd, 0xd01f2900, 0x46602301, 0x469c25ff, 0x00894e11, 0x447e1841,
    0x88034667, 0x409f8844, 0x2f00409c, 0x2201d012, 0x4252193f, 0x34017823, 0x402b4053, 0x599b009b,
    0x405a0a12, 0xd1f542bc, 0xc00443d2, 0xd1e74281, 0xbdf02000, 0xe7f82200, 0x000000b2, 0xedb88320,
    0x00000042,
];

/// Encodes one analyzer request: `log2(size)` in the low half word and the
/// index of the block in the high half word.
///
/// Returns `None` if the routine cannot express the request.
pub(crate) fn encode_request(address: u64, size: u64) -> Option<u32> {
    if !size.is_power_of_two() || address % size != 0 {
        return None;
    }
    let index = address / size;
    if index > 0xFFFF {
        return None;
    }
    Some(size.trailing_zeros() | (index as u32) << 16)
}

/// IEEE CRC32, as computed by the analyzer routine.
pub(crate) fn crc32(data: &[u8]) -> u32 {
    crc::crc32::checksum_ieee(data)
}
