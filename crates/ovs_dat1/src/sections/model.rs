use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use derive_more::derive::{Deref, IntoIterator};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};
use crate::hash::{crc32, crc64};

/// A material slot of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMaterial {
    pub path: String,
    pub slot_name: String,
    pub path_hash: u64,
    pub slot_hash: u32,
}

impl ModelMaterial {
    /// Build a slot, hashing path and slot name.
    pub fn new(path: impl Into<String>, slot_name: impl Into<String>) -> Self {
        let path = path.into();
        let slot_name = slot_name.into();
        ModelMaterial {
            path_hash: crc64(&path),
            slot_hash: crc32(&slot_name),
            path,
            slot_name,
        }
    }
}

/// Material slots of a model.
///
/// On disk the section holds `n` pairs of container string offsets followed by `n` hash records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct ModelMaterials(pub Vec<ModelMaterial>);

impl SectionCodec for ModelMaterials {
    const NAME: &'static str = "model materials";

    fn read(data: &[u8], ctx: &ReadContext<'_>) -> Result<Self> {
        let count = data.len() / 32;
        let mut cursor = Cursor::new(data);

        let mut materials = Vec::with_capacity(count);
        for _ in 0..count {
            let path_offset = cursor.read_u64::<LittleEndian>()? as u32;
            let slot_offset = cursor.read_u64::<LittleEndian>()? as u32;

            let path = ctx
                .strings
                .get(path_offset)
                .ok_or(Error::StringNotFound(path_offset))?;
            let slot_name = ctx
                .strings
                .get(slot_offset)
                .ok_or(Error::StringNotFound(slot_offset))?;

            materials.push(ModelMaterial {
                path: path.to_owned(),
                slot_name: slot_name.to_owned(),
                ..Default::default()
            });
        }

        for material in &mut materials {
            material.path_hash = cursor.read_u64::<LittleEndian>()?;
            material.slot_hash = cursor.read_u32::<LittleEndian>()?;
            cursor.read_u32::<LittleEndian>()?;
        }

        Ok(ModelMaterials(materials))
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Err(Error::ReadOnlySection(ctx.tag))
    }
}
