use binrw::{BinRead, BinWrite};

use super::Record;

/// Asset entry of a Wwise lookup table.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct WwiseAsset {
    pub asset_id: u64,
    pub string_offset: u32,
}

impl Record for WwiseAsset {
    const WIDTH: usize = 12;
    const NAME: &'static str = "wwise lookup assets";
}

/// Event entry of a Wwise lookup table.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct WwiseEvent {
    pub soundbank_asset_id: u64,
    /// Not always an existing asset, sometimes a performance set
    pub asset_id: u64,
    pub zero1: u32,
    pub zero2: u32,
    pub name_offset: u32,
    /// Entry whose name has this entry's name as a prefix, `-1` if none
    pub next_index: i32,
    pub flags: u32,
}

impl Record for WwiseEvent {
    const WIDTH: usize = 36;
    const NAME: &'static str = "wwise lookup events";
}
