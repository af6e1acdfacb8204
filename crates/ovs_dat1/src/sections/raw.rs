use derive_more::derive::{AsRef, Deref, DerefMut};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::Result;

/// Opaque section bytes, written back exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsRef, Deref, DerefMut)]
pub struct RawSection(pub Vec<u8>);

impl SectionCodec for RawSection {
    const NAME: &'static str = "raw bytes";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        Ok(RawSection(data.to_vec()))
    }

    fn write(&self, _ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

impl From<Vec<u8>> for RawSection {
    fn from(value: Vec<u8>) -> Self {
        RawSection(value)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::RawSection;
    use crate::error::Result;
    use crate::sections::{ReadContext, SectionCodec, WriteContext};
    use crate::strings::StringBlock;

    #[test]
    fn bytes_are_kept() -> Result<()> {
        let input = [0x00, 0xFF, 0x10, 0x20, 0x30];

        let mut strings = StringBlock::default();
        let section = RawSection::read(
            &input,
            &ReadContext {
                tag: 0,
                original_offset: 0,
                strings: &strings,
            },
        )?;
        assert_eq!(section.as_slice(), &input[..]);

        assert_eq!(section.write(&mut WriteContext::new(0, &mut strings))?, input.to_vec());

        Ok(())
    }
}
