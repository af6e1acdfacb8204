//! Tile stream framing.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::error::{Error, Result};

/// Format id of GDeflate tile streams
pub const GDEFLATE_ID: u8 = 4;

/// Uncompressed size of every tile but the last
pub const TILE_SIZE: usize = 64 * 1024;

/// Fixed part of a tile stream
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TileStreamHeader {
    pub id: u8,
    /// Complement of `id`
    pub magic: u8,
    pub num_tiles: u16,
    /// `tile_size_index: 2, last_tile_size: 18, reserved: 12`
    pub packed: u32,
}

impl TileStreamHeader {
    pub fn tile_size_index(&self) -> u32 {
        self.packed & 0x3
    }

    /// Uncompressed size of the last tile, 0 when it is a full tile
    pub fn last_tile_size(&self) -> u32 {
        (self.packed >> 2) & 0x3FFFF
    }
}

/// A parsed tile stream borrowing its compressed payloads.
#[derive(Debug, Clone)]
pub struct TileStream<'a> {
    pub header: TileStreamHeader,
    pub offsets: Vec<u32>,
    payload: &'a [u8],
}

impl<'a> TileStream<'a> {
    /// Parse the header and offset table of a stream.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let header = TileStreamHeader::read(&mut cursor)?;

        if header.id != GDEFLATE_ID {
            return Err(Error::InvalidTileStream(format!(
                "unknown format id {}",
                header.id
            )));
        }
        if header.magic != !header.id {
            return Err(Error::InvalidTileStream(format!(
                "magic {:#04X} does not match id {}",
                header.magic, header.id
            )));
        }

        let offsets = (0..header.num_tiles)
            .map(|_| u32::read_le(&mut cursor))
            .collect::<binrw::BinResult<Vec<_>>>()?;
        let payload = &data[cursor.position() as usize..];

        Ok(TileStream {
            header,
            offsets,
            payload,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Compressed bytes of a tile.
    ///
    /// The first slot of the offset table holds the compressed size of the last tile, every other
    /// slot the start of its tile.
    pub fn tile(&self, index: usize) -> Result<&'a [u8]> {
        let count = self.offsets.len();
        if index >= count {
            return Err(Error::InvalidTileStream(format!(
                "tile {index} of a {count} tile stream"
            )));
        }

        let start = if index == 0 {
            0
        } else {
            self.offsets[index] as usize
        };
        let size = if index + 1 < count {
            (self.offsets[index + 1] as usize).checked_sub(start)
        } else {
            Some(self.offsets[0] as usize)
        };

        size.and_then(|size| self.payload.get(start..start + size))
            .ok_or_else(|| {
                Error::InvalidTileStream(format!(
                    "tile {index} lies outside of {} payload bytes",
                    self.payload.len()
                ))
            })
    }

    /// Compressed bytes of every tile, in order.
    pub fn tiles(&self) -> impl Iterator<Item = Result<&'a [u8]>> + '_ {
        (0..self.len()).map(|i| self.tile(i))
    }
}
