use binrw::{helpers::until_eof, BinRead, BinWrite};

use super::serialized::Extraction;
use super::{ReadContext, Record, SectionCodec, WriteContext};
use crate::dat1::Dat1;
use crate::error::{Error, Result};
use crate::tags;

/// Placement of an actor, followed by data this library does not decode.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct ActorObject {
    pub matrix: [[f32; 4]; 4],
    pub zeroes64: [u8; 28],
    pub object_type: u32,
    pub zeroes96: [u8; 16],
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub section_size: u32,
    #[br(parse_with = until_eof)]
    pub tail: Vec<u8>,
}

impl ActorObject {
    const PREFIX: usize = 128;
}

impl SectionCodec for ActorObject {
    const NAME: &'static str = "an actor object";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        if data.len() < Self::PREFIX {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: Self::PREFIX - data.len(),
            });
        }
        Ok(<ActorObject as BinRead>::read(&mut std::io::Cursor::new(data))?)
    }

    fn write(&self, _ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        let mut cursor = std::io::Cursor::new(Vec::with_capacity(Self::PREFIX + self.tail.len()));
        BinWrite::write(self, &mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// Entry of the "Actor Prius Built" table.
///
/// `offset` and `size` locate a structured blob inside the "Actor Prius Built Data" section, with
/// `offset` counted from the start of the container the entry was loaded from.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct PriusEntry {
    pub unknown0: u64,
    pub string_offset: u32,
    pub string_hash: u32,
    pub unknown16: u32,
    pub offset: u32,
    pub size: u32,
    pub unknown28: u32,
}

impl Record for PriusEntry {
    const WIDTH: usize = 32;
    const NAME: &'static str = "actor prius entries";

    fn rebase(&mut self, ctx: &WriteContext<'_>) {
        if self.string_offset != 0 {
            self.string_offset = (i64::from(self.string_offset) + ctx.string_shift) as u32;
        }
        if self.size != 0 {
            let shift = ctx.section_shift(tags::actor::PRIUS_BUILT_DATA);
            self.offset = (i64::from(self.offset) + shift) as u32;
        }
    }
}

impl PriusEntry {
    /// Decode the structured blob this entry points at.
    pub fn data(&self, dat1: &Dat1) -> Extraction {
        dat1.extract_structured(tags::actor::PRIUS_BUILT_DATA, self.offset, self.size)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{ActorObject, PriusEntry};
    use crate::error::{Error, Result};
    use crate::sections::{ArraySection, ReadContext, SectionCodec, WriteContext};
    use crate::strings::StringBlock;
    use crate::tags;

    #[rustfmt::skip]
    const OBJECT: [u8; 132] = [
        // matrix, identity
        0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F,
        // zeroes
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x05, 0x00, 0x00, 0x00, // object type
        // zeroes
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x20, 0x41, // x = 10.0
        0x00, 0x00, 0x00, 0x00, // y = 0.0
        0x00, 0x00, 0xA0, 0xC0, // z = -5.0
        0x84, 0x00, 0x00, 0x00, // section size
        // tail
        0xDE, 0xAD, 0xBE, 0xEF,
    ];

    fn context(strings: &StringBlock) -> ReadContext<'_> {
        ReadContext {
            tag: tags::actor::OBJECT_BUILT,
            original_offset: 0,
            strings,
        }
    }

    #[test]
    fn object_layout() -> Result<()> {
        let mut strings = StringBlock::default();
        let object = ActorObject::read(&OBJECT, &context(&strings))?;

        assert_eq!(object.matrix[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(object.matrix[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(object.object_type, 5);
        assert_eq!((object.x, object.y, object.z), (10.0, 0.0, -5.0));
        assert_eq!(object.section_size, 0x84);
        assert_eq!(object.tail, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        let mut ctx = WriteContext::new(tags::actor::OBJECT_BUILT, &mut strings);
        assert_eq!(object.write(&mut ctx)?, OBJECT.to_vec());

        Ok(())
    }

    #[test]
    fn object_without_tail() -> Result<()> {
        let mut strings = StringBlock::default();
        let object = ActorObject::read(&OBJECT[..128], &context(&strings))?;
        assert!(object.tail.is_empty());

        let mut ctx = WriteContext::new(tags::actor::OBJECT_BUILT, &mut strings);
        assert_eq!(object.write(&mut ctx)?, OBJECT[..128].to_vec());

        Ok(())
    }

    #[test]
    fn short_object() {
        let strings = StringBlock::default();
        assert!(matches!(
            ActorObject::read(&OBJECT[..100], &context(&strings)),
            Err(Error::Truncated { needed: 28, .. })
        ));
    }

    #[test]
    fn prius_entries_follow_moves() -> Result<()> {
        let section = ArraySection::new(vec![
            PriusEntry {
                string_offset: 0x30,
                offset: 0x100,
                size: 0x20,
                ..Default::default()
            },
            PriusEntry {
                offset: 0x100,
                size: 0,
                ..Default::default()
            },
        ]);

        let mut strings = StringBlock::default();
        let shifts = [(tags::actor::PRIUS_BUILT_DATA, 0x10)];
        let mut ctx = WriteContext {
            tag: tags::actor::PRIUS_BUILT,
            strings: &mut strings,
            string_shift: 12,
            section_shifts: &shifts,
        };
        let bytes = section.write(&mut ctx)?;
        let moved = ArraySection::<PriusEntry>::read(&bytes, &context(&StringBlock::default()))?;

        assert_eq!(moved[0].string_offset, 0x3C);
        assert_eq!(moved[0].offset, 0x110);
        assert_eq!(moved[1], section[1]);

        Ok(())
    }
}
