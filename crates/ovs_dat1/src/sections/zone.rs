use std::io::Cursor;

use binrw::{BinRead, BinResult};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};

/// Where the groups and items of one object kind are stored.
///
/// Offsets are counted from the start of the section.
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[br(little)]
pub struct HibernateHeader {
    pub unknown: [u32; 4],
    pub groups_offset: u32,
    pub groups_count: u32,
    pub items_offset: u32,
    pub items_count: u32,
}

/// A run of items sharing a group.
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[br(little)]
pub struct HibernateGroup {
    pub unknown: [u32; 4],
    /// Almost always 0
    pub flags: u32,
    pub count: u32,
    pub first_item: u32,
    /// Repeats `count`
    pub count2: u32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[br(little)]
pub struct HibernateItem {
    pub unknown: [u32; 10],
}

/// Groups and items of one object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HibernateObjects {
    pub groups: Vec<HibernateGroup>,
    pub items: Vec<HibernateItem>,
}

impl HibernateObjects {
    fn read(cursor: &mut Cursor<&[u8]>, header: &HibernateHeader) -> BinResult<Self> {
        let groups = (0..header.groups_count)
            .map(|_| HibernateGroup::read(cursor))
            .collect::<BinResult<Vec<_>>>()?;
        let items = (0..header.items_count)
            .map(|_| HibernateItem::read(cursor))
            .collect::<BinResult<Vec<_>>>()?;
        Ok(HibernateObjects { groups, items })
    }
}

/// Objects of a zone that are unloaded while the zone hibernates: models, effects and lights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneHibernateObjects {
    pub models_header: HibernateHeader,
    pub vfx_header: HibernateHeader,
    pub lights_header: HibernateHeader,
    pub payload_offset: u32,
    pub unknown_count: u32,
    /// Bytes between the fixed prefix and the first group
    pub unknown: Vec<u8>,
    pub models: HibernateObjects,
    pub vfx: HibernateObjects,
    pub lights: HibernateObjects,
}

impl ZoneHibernateObjects {
    const PREFIX: usize = 3 * 32 + 8;
}

impl SectionCodec for ZoneHibernateObjects {
    const NAME: &'static str = "zone hibernate objects";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        if data.len() < Self::PREFIX {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: Self::PREFIX - data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let models_header = HibernateHeader::read(&mut cursor)?;
        let vfx_header = HibernateHeader::read(&mut cursor)?;
        let lights_header = HibernateHeader::read(&mut cursor)?;
        let payload_offset = u32::read_le(&mut cursor)?;
        let unknown_count = u32::read_le(&mut cursor)?;

        // groups and items follow each other, starting at the lowest group offset
        let first = [models_header, vfx_header, lights_header]
            .iter()
            .map(|h| h.groups_offset as usize)
            .min()
            .unwrap_or(Self::PREFIX);
        if first < Self::PREFIX || first > data.len() {
            return Err(Error::Truncated {
                offset: Self::PREFIX,
                needed: first.saturating_sub(data.len()),
            });
        }
        let unknown = data[Self::PREFIX..first].to_vec();
        cursor.set_position(first as u64);

        let models = HibernateObjects::read(&mut cursor, &models_header)?;
        let vfx = HibernateObjects::read(&mut cursor, &vfx_header)?;
        let lights = HibernateObjects::read(&mut cursor, &lights_header)?;

        Ok(ZoneHibernateObjects {
            models_header,
            vfx_header,
            lights_header,
            payload_offset,
            unknown_count,
            unknown,
            models,
            vfx,
            lights,
        })
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Err(Error::ReadOnlySection(ctx.tag))
    }
}
