//! Sections of level assets.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use super::{ReadContext, Record, SectionCodec, WriteContext};
use crate::error::{Error, Result};

/// Counts of the other level tables.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct LevelBuilt {
    pub unknown0: u64,
    pub unknown8: u32,
    pub regions_count: u32,
    pub some_count: u32,
    pub unknown20: u32,
    pub zones_count: u32,
    pub links_count: u32,
    pub unknowns_count: u32,
    pub unknown36: u32,
}

impl LevelBuilt {
    const SIZE: usize = 40;
}

impl SectionCodec for LevelBuilt {
    const NAME: &'static str = "a level header";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: Self::SIZE - data.len(),
            });
        }
        Ok(<LevelBuilt as BinRead>::read(&mut Cursor::new(data))?)
    }

    fn write(&self, _ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(Self::SIZE));
        BinWrite::write(self, &mut cursor)?;
        Ok(cursor.into_inner())
    }
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct EmbeddedZone {
    pub zone_id: u64,
    pub a: u32,
    pub b: u32,
}

impl Record for EmbeddedZone {
    const WIDTH: usize = 16;
    const NAME: &'static str = "level embedded zones";
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq)]
#[brw(little)]
pub struct LevelLink {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub name_hash: u32,
    pub name_index: u32,
    pub index2: u32,
    /// Always `0xFFFF`
    pub unknown: u32,
    pub position: [f32; 3],
    pub zero: u32,
}

impl Record for LevelLink {
    const WIDTH: usize = 56;
    const NAME: &'static str = "level link data";
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct RandomListEntry {
    pub flags: u32,
    pub zero: u32,
    pub flags2: u32,
    pub d: u32,
    pub e: u32,
    pub f: u32,
}

impl Record for RandomListEntry {
    const WIDTH: usize = 24;
    const NAME: &'static str = "a level random list";
}

/// Node of the region tree. Indices of -1 mean none.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct LevelRegion {
    pub name_hash: u64,
    pub index: u32,
    pub unknown1: i16,
    pub unknown2: i16,
    pub parent: i32,
    pub first_child: i32,
    pub children: u32,
    pub index1: i32,
    pub count1: u32,
    pub index2: i32,
    pub count2: u32,
    pub index3: u32,
    pub count3: u32,
    pub unknown3: i16,
    pub unknown4: i16,
}

impl Record for LevelRegion {
    const WIDTH: usize = 56;
    const NAME: &'static str = "level regions";
}

/// A named block; `string_offset` points into the container string block.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct LevelNamedBlock {
    pub string_offset: u32,
    pub string_hash: u32,
    pub offset: u32,
    pub size: u32,
}

impl Record for LevelNamedBlock {
    const WIDTH: usize = 16;
    const NAME: &'static str = "level named blocks";

    fn rebase(&mut self, ctx: &WriteContext<'_>) {
        if self.string_offset != 0 {
            self.string_offset = (i64::from(self.string_offset) + ctx.string_shift) as u32;
        }
    }
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct LevelGroup {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub zero: u32,
}

impl Record for LevelGroup {
    const WIDTH: usize = 16;
    const NAME: &'static str = "level groups";
}

/// A slice of the zone index list.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct ZoneIndexGroup {
    pub a: u16,
    pub b: u16,
    pub first: u16,
    pub zero1: u16,
    pub count: u16,
    pub zero2: [u16; 3],
}

impl Record for ZoneIndexGroup {
    const WIDTH: usize = 16;
    const NAME: &'static str = "level zone index groups";
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct LevelZone {
    pub name_hash: u64,
    pub zero1: u32,
    pub zero2: u32,
    pub name_index: u32,
    /// -1 unless this is a main zone
    pub main_zone: i32,
    /// 0 regular, 1 impostors, 2 lgt, 3 light grid
    pub kind: u32,
    pub zero3: u32,
}

impl Record for LevelZone {
    const WIDTH: usize = 32;
    const NAME: &'static str = "level zones";
}
