//! The asset header block.

use std::io::Cursor;

use binrw::{binrw, BinRead, BinWrite};

use crate::error::Result;

/// A pair of values in an [`AssetHeader`]; for configs `a` is the size of the DAT1
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub a: u32,
    pub b: u32,
}

/// Install-time header stored next to an asset in the archive index.
///
/// | Offset (bytes) | Field        | Description                                   |
/// |----------------|--------------|-----------------------------------------------|
/// | 0x0000         | Magic        | 4 bytes: type magic of the wrapped DAT1       |
/// | 0x0004         | Unknown      | 1 byte                                        |
/// | 0x0005         | Pairs count  | 1 byte                                        |
/// | 0x0006         | Extra size   | 2 bytes                                       |
/// | 0x0008         | Pairs        | 8 bytes per pair                              |
/// | ...            | Extra        | Extra size bytes                              |
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssetHeader {
    pub magic: u32,
    pub unknown: u8,

    #[br(temp)]
    #[bw(try_calc = u8::try_from(pairs.len()))]
    pairs_count: u8,

    #[br(temp)]
    #[bw(try_calc = u16::try_from(extra.len()))]
    extra_size: u16,

    #[br(count = pairs_count)]
    pub pairs: Vec<HeaderPair>,

    #[br(count = extra_size)]
    pub extra: Vec<u8>,
}

impl AssetHeader {
    /// Header for a freshly made asset of the given type.
    pub fn new(magic: u32) -> Self {
        AssetHeader {
            magic,
            ..Default::default()
        }
    }

    /// Parse a header block.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(AssetHeader::read(&mut Cursor::new(data))?)
    }

    /// Serialize the header block.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(8 + self.pairs.len() * 8 + self.extra.len()));
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}
