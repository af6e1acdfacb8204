use binrw::{BinRead, BinWrite};

use super::Record;

/// One event of a sound bank.
///
/// `a` equals `b` most of the time, otherwise `a < b`.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct SoundbankEvent {
    pub event_id: u32,
    pub small: u16,
    pub flags: u16,
    pub zero: u16,
    pub flags2: u16,
    pub a: u16,
    pub b: u16,
}

impl Record for SoundbankEvent {
    const WIDTH: usize = 16;
    const NAME: &'static str = "sound bank events";
    const WRITABLE: bool = false;
}

/// Maps a streamed source to the event playing it.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct StreamLookup {
    pub source_id: u32,
    pub event_id: u32,
}

impl Record for StreamLookup {
    const WIDTH: usize = 8;
    const NAME: &'static str = "a sound bank stream lookup";
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{SoundbankEvent, StreamLookup};
    use crate::error::{Error, Result};
    use crate::sections::{ArraySection, ReadContext, SectionCodec, WriteContext};
    use crate::strings::StringBlock;
    use crate::tags;

    #[test]
    fn events_are_read_only() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x78, 0x56, 0x34, 0x12,
            0x01, 0x00,
            0x02, 0x00,
            0x00, 0x00,
            0x03, 0x00,
            0x04, 0x00,
            0x05, 0x00,
        ];

        let mut strings = StringBlock::default();
        let section = ArraySection::<SoundbankEvent>::read(
            &input,
            &ReadContext {
                tag: tags::soundbank::INFO,
                original_offset: 0,
                strings: &strings,
            },
        )?;
        assert_eq!(
            section.values,
            vec![SoundbankEvent {
                event_id: 0x12345678,
                small: 1,
                flags: 2,
                zero: 0,
                flags2: 3,
                a: 4,
                b: 5,
            }]
        );

        let mut ctx = WriteContext {
            tag: tags::soundbank::INFO,
            strings: &mut strings,
            string_shift: 0,
            section_shifts: &[],
        };
        assert!(matches!(
            section.write(&mut ctx),
            Err(Error::ReadOnlySection(tags::soundbank::INFO))
        ));

        Ok(())
    }

    #[test]
    fn stream_lookup() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        ];

        let mut strings = StringBlock::default();
        let section = ArraySection::<StreamLookup>::read(
            &input,
            &ReadContext {
                tag: tags::soundbank::STREAM_LOOKUP,
                original_offset: 0,
                strings: &strings,
            },
        )?;
        assert_eq!(section.len(), 2);
        assert_eq!(section[1].source_id, 3);
        assert_eq!(section[1].event_id, 4);

        let mut ctx = WriteContext {
            tag: tags::soundbank::STREAM_LOOKUP,
            strings: &mut strings,
            string_shift: 0,
            section_shifts: &[],
        };
        assert_eq!(section.write(&mut ctx)?, input.to_vec());

        Ok(())
    }
}
