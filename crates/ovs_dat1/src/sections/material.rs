use std::io::{Cursor, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};

/// A texture parameter of a material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTexture {
    /// Offset of the path inside the trailing string blob
    pub offset: u32,
    pub hash: u32,
    pub path: String,
}

/// Material parameters. Only the texture parameters are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialData {
    pub section_size: u32,
    pub parameters_count: u32,
    pub parameters_end: u32,
    pub textures: Vec<MaterialTexture>,
}

impl SectionCodec for MaterialData {
    const NAME: &'static str = "material data";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        let truncated = |offset: usize| Error::Truncated { offset, needed: 4 };
        let mut cursor = Cursor::new(data);
        let next = |cursor: &mut Cursor<&[u8]>| {
            let offset = cursor.position() as usize;
            cursor
                .read_u32::<LittleEndian>()
                .map_err(|_| truncated(offset))
        };

        let section_size = next(&mut cursor)?;
        let parameters_count = next(&mut cursor)?;
        next(&mut cursor)?;
        next(&mut cursor)?;
        let parameters_end = next(&mut cursor)?;
        let textures_count = next(&mut cursor)?;
        let textures_offset = next(&mut cursor)?;
        let textures_end = next(&mut cursor)?;

        if textures_offset as usize > data.len() {
            return Err(truncated(textures_offset as usize));
        }
        cursor.seek(SeekFrom::Start(u64::from(textures_offset)))?;

        let mut records = Vec::new();
        for _ in 0..textures_count {
            let offset = next(&mut cursor)?;
            let hash = next(&mut cursor)?;
            records.push((offset, hash));
        }

        if cursor.position() < u64::from(textures_end) {
            cursor.seek(SeekFrom::Start(u64::from(textures_end)))?;
        }
        let blob = data.get(cursor.position() as usize..).unwrap_or_default();

        let textures = records
            .into_iter()
            .map(|(offset, hash)| {
                let start = (offset as usize).min(blob.len());
                let end = blob[start..]
                    .iter()
                    .position(|b| *b == 0)
                    .map_or(blob.len(), |p| start + p);
                Ok(MaterialTexture {
                    offset,
                    hash,
                    path: String::from_utf8(blob[start..end].to_vec())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MaterialData {
            section_size,
            parameters_count,
            parameters_end,
            textures,
        })
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Err(Error::ReadOnlySection(ctx.tag))
    }
}
