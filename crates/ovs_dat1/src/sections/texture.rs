use binrw::{helpers::until_eof, BinRead};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};

/// Texture dimensions and formats for the standard and high definition mip chains.
#[derive(BinRead, Debug, Clone, Default, PartialEq, Eq)]
#[br(little)]
pub struct TextureHeader {
    pub sd_len: u32,
    pub hd_len: u32,
    pub hd_width: u16,
    pub hd_height: u16,
    pub sd_width: u16,
    pub sd_height: u16,
    pub array_size: u16,
    pub stex_format: u8,
    pub planes: u8,
    pub format: u16,
    pub unknown: u64,
    pub sd_mipmaps: u8,
    pub unknown2: u8,
    pub hd_mipmaps: u8,
    pub unknown3: u8,
    #[br(parse_with = until_eof)]
    pub tail: Vec<u8>,
}

impl TextureHeader {
    const PREFIX: usize = 34;
}

impl SectionCodec for TextureHeader {
    const NAME: &'static str = "a texture header";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        if data.len() < Self::PREFIX {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: Self::PREFIX - data.len(),
            });
        }
        Ok(<TextureHeader as BinRead>::read(&mut std::io::Cursor::new(data))?)
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Err(Error::ReadOnlySection(ctx.tag))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::TextureHeader;
    use crate::error::Result;
    use crate::sections::{ReadContext, SectionCodec};
    use crate::strings::StringBlock;

    #[test]
    fn header() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x00, 0x00, 0x01, 0x00, // sd_len
            0x00, 0x00, 0x10, 0x00, // hd_len
            0x00, 0x08, 0x00, 0x08, // hd 2048x2048
            0x00, 0x02, 0x00, 0x02, // sd 512x512
            0x01, 0x00,             // array size
            0x47,                   // stex format
            0x01,                   // planes
            0x62, 0x00,             // format
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x0C, 0x00, // mipmaps
            0xEE, 0xFF,             // tail
        ];

        let strings = StringBlock::default();
        let header = TextureHeader::read(
            &input,
            &ReadContext {
                tag: 0,
                original_offset: 0,
                strings: &strings,
            },
        )?;

        assert_eq!(header.sd_len, 0x10000);
        assert_eq!(header.hd_len, 0x100000);
        assert_eq!((header.hd_width, header.hd_height), (2048, 2048));
        assert_eq!((header.sd_width, header.sd_height), (512, 512));
        assert_eq!(header.format, 0x62);
        assert_eq!(header.sd_mipmaps, 10);
        assert_eq!(header.hd_mipmaps, 12);
        assert_eq!(header.tail, vec![0xEE, 0xFF]);

        Ok(())
    }
}
