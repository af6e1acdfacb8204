use binrw::{BinRead, BinWrite};

use super::{Record, WriteContext};

/// A dependency of an asset on another asset.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[brw(little)]
pub struct Reference {
    /// Hash of the referenced path, see [`crate::hash::asset_id`]
    pub asset_id: u64,
    /// Offset of the referenced path inside the container string block
    pub path_offset: u32,
    /// CRC-32 of the referenced file extension
    pub extension_hash: u32,
}

impl Record for Reference {
    const WIDTH: usize = 16;
    const NAME: &'static str = "asset references";

    fn rebase(&mut self, ctx: &WriteContext<'_>) {
        self.path_offset = (i64::from(self.path_offset) + ctx.string_shift) as u32;
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Reference;
    use crate::error::Result;
    use crate::sections::{ArraySection, ReadContext, SectionCodec, WriteContext};
    use crate::strings::StringBlock;

    #[test]
    fn single_reference() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x2A,
            0x10, 0x00, 0x00, 0x00,
            0xAB, 0xCD, 0xEF, 0x01,
        ];

        let mut strings = StringBlock::default();
        let section = ArraySection::<Reference>::read(
            &input,
            &ReadContext {
                tag: 0,
                original_offset: 0,
                strings: &strings,
            },
        )?;

        assert_eq!(
            section.values,
            vec![Reference {
                asset_id: 0x2A06050403020100,
                path_offset: 0x10,
                extension_hash: 0x01EFCDAB,
            }]
        );

        let mut ctx = WriteContext {
            tag: 0,
            strings: &mut strings,
            string_shift: 0,
            section_shifts: &[],
        };
        assert_eq!(section.write(&mut ctx)?, input.to_vec());

        Ok(())
    }

    #[test]
    fn path_offsets_follow_the_string_block() -> Result<()> {
        let section = ArraySection::new(vec![Reference {
            asset_id: 1,
            path_offset: 40,
            extension_hash: 2,
        }]);

        let mut strings = StringBlock::default();
        let mut ctx = WriteContext {
            tag: 0,
            strings: &mut strings,
            string_shift: -12,
            section_shifts: &[],
        };
        let bytes = section.write(&mut ctx)?;
        assert_eq!(bytes[8..12], 28u32.to_le_bytes());

        Ok(())
    }
}
