use std::fmt::{Debug, Formatter};
use std::ops::Range;

use flashmap_target::{FlashRegion, MemoryRange};

use super::FlashError;

/// The description of a page in flash.
#[derive(Clone, PartialEq, Eq)]
pub struct FlashPage {
    address: u64,
    data: Vec<u8>,
}

impl Debug for FlashPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashPage")
            .field("address", &format_args!("{:#010x}", self.address))
            .field("size", &format_args!("{:#x}", self.size()))
            .finish()
    }
}

impl FlashPage {
    /// Returns the start address of the page.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Returns the size of the page in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns the address range of the page.
    pub fn address_range(&self) -> Range<u64> {
        self.address..self.address + self.size()
    }

    /// Returns the data slice of the page.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(super) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// The description of a sector in flash.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlashSector {
    address: u64,
    size: u64,
}

impl Debug for FlashSector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashSector")
            .field("address", &format_args!("{:#010x}", self.address))
            .field("size", &format_args!("{:#x}", self.size))
            .finish()
    }
}

impl FlashSector {
    /// Returns the start address of the sector.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Returns the size of the sector in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the address range of the sector.
    pub fn address_range(&self) -> Range<u64> {
        self.address..self.address + self.size
    }
}

/// A part of a page that is not covered by the written data and has to be
/// restored to its current contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashFill {
    address: u64,
    size: u64,
    page_index: usize,
}

impl FlashFill {
    /// Returns the start address of the fill.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Returns the size of the fill in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the corresponding page index of the fill.
    pub fn page_index(&self) -> usize {
        self.page_index
    }
}

/// The built layout of the data in flash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashLayout {
    sectors: Vec<FlashSector>,
    pages: Vec<FlashPage>,
    fills: Vec<FlashFill>,
}

impl FlashLayout {
    /// Get the sectors of the flash layout.
    pub fn sectors(&self) -> &[FlashSector] {
        &self.sectors
    }

    /// Get the pages of the flash layout.
    pub fn pages(&self) -> &[FlashPage] {
        &self.pages
    }

    pub(super) fn pages_mut(&mut self) -> &mut [FlashPage] {
        &mut self.pages
    }

    /// Get the fills of the flash layout.
    pub fn fills(&self) -> &[FlashFill] {
        &self.fills
    }
}

/// Splits a write of `data` at `address` into the sectors and pages of `region`.
///
/// Bytes of a page that are not covered by `data` hold the erased byte value.
/// With `restore_unwritten_bytes`, every page of every touched sector is part
/// of the layout and the uncovered parts are listed as fills, to be read from
/// the target before erasing.
pub(super) fn build_layout(
    region: &FlashRegion,
    address: u64,
    data: &[u8],
    restore_unwritten_bytes: bool,
) -> Result<FlashLayout, FlashError> {
    let request = address..address + data.len() as u64;
    if data.is_empty() {
        return Ok(FlashLayout::default());
    }
    if !region.range.contains_range(&request) {
        return Err(FlashError::AddressNotInRegion {
            range: request,
            region: region.range.clone(),
        });
    }

    let sectors: Vec<FlashSector> = region
        .iter_sectors()
        .filter(|sector| sector.address_range().intersects_range(&request))
        .map(|sector| FlashSector {
            address: sector.base_address,
            size: sector.size,
        })
        .collect();

    let page_span = if restore_unwritten_bytes {
        let start = sectors.first().map_or(request.start, |s| s.address);
        let end = sectors.last().map_or(request.end, |s| s.address + s.size);
        start..end
    } else {
        request.clone()
    };

    let mut pages = Vec::new();
    let mut fills = Vec::new();
    let mut next = page_span.start;
    while next < page_span.end {
        let info = region
            .page_info(next)
            .ok_or(FlashError::RegionNotFound { address: next })?;
        let page_range = info.address_range();

        let mut page = FlashPage {
            address: info.base_address,
            data: vec![region.erased_byte_value; info.size as usize],
        };

        let covered = request.start.max(page_range.start)..request.end.min(page_range.end);
        if covered.start < covered.end {
            let src = (covered.start - request.start) as usize;
            let dst = (covered.start - page_range.start) as usize;
            let len = (covered.end - covered.start) as usize;
            page.data[dst..dst + len].copy_from_slice(&data[src..src + len]);
        }

        if restore_unwritten_bytes {
            let page_index = pages.len();
            let uncovered = if covered.start < covered.end {
                vec![
                    page_range.start..covered.start,
                    covered.end..page_range.end,
                ]
            } else {
                vec![page_range.clone()]
            };
            fills.extend(
                uncovered
                    .into_iter()
                    .filter(|range| !range.is_empty())
                    .map(|range| FlashFill {
                        address: range.start,
                        size: range.end - range.start,
                        page_index,
                    }),
            );
        }

        tracing::trace!(
            "Added Page ({:#010x}..{:#010x})",
            page_range.start,
            page_range.end
        );
        pages.push(page);
        next = page_range.end;
    }

    Ok(FlashLayout {
        sectors,
        pages,
        fills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region() -> FlashRegion {
        FlashRegion {
            name: None,
            range: 0..0x2000,
            blocksize: 0x400,
            is_boot_memory: true,
            is_erasable: true,
            erased_byte_value: 0xFF,
            core_index: 0,
            algorithm: None,
        }
    }

    #[test]
    fn single_page() {
        let layout = build_layout(&region(), 0x400, &[0x42; 0x400], false).unwrap();

        assert_eq!(layout.sectors().len(), 1);
        assert_eq!(layout.sectors()[0].address_range(), 0x400..0x800);
        assert_eq!(layout.pages().len(), 1);
        assert_eq!(layout.pages()[0].data(), &[0x42; 0x400][..]);
        assert!(layout.fills().is_empty());
    }

    #[test]
    fn unaligned_request_is_padded_with_erased_value() {
        let layout = build_layout(&region(), 0x3fe, &[1, 2, 3, 4], false).unwrap();

        assert_eq!(layout.sectors().len(), 2);
        let pages = layout.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].address(), 0);
        assert_eq!(&pages[0].data()[0x3fc..], &[0xFF, 0xFF, 1, 2]);
        assert_eq!(pages[1].address(), 0x400);
        assert_eq!(&pages[1].data()[..4], &[3, 4, 0xFF, 0xFF]);
    }

    #[test]
    fn restore_covers_whole_sectors() {
        let layout = build_layout(&region(), 0x410, &[0; 0x10], true).unwrap();

        assert_eq!(layout.pages().len(), 1);
        assert_eq!(
            layout.fills(),
            &[
                FlashFill {
                    address: 0x400,
                    size: 0x10,
                    page_index: 0
                },
                FlashFill {
                    address: 0x420,
                    size: 0x3e0,
                    page_index: 0
                },
            ]
        );
    }

    #[test]
    fn request_leaving_region() {
        let result = build_layout(&region(), 0x1f00, &[0; 0x200], false);
        assert!(matches!(
            result,
            Err(FlashError::AddressNotInRegion { .. })
        ));
    }

    #[test]
    fn empty_request() {
        let layout = build_layout(&region(), 0x100, &[], false).unwrap();
        assert!(layout.pages().is_empty());
        assert!(layout.sectors().is_empty());
    }
}
