use std::io::Cursor;

use binrw::{BinRead, BinWrite, Endian};
use byteorder::{ByteOrder, LittleEndian};
use derive_more::derive::{Constructor, Deref, DerefMut, IntoIterator};

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};

/// A fixed width record stored back to back inside an array section.
pub trait Record:
    for<'a> BinRead<Args<'a> = ()> + for<'a> BinWrite<Args<'a> = ()> + Clone
{
    /// Size of one record on disk
    const WIDTH: usize;
    /// Name used in diagnostics
    const NAME: &'static str;
    /// Whether sections of this record type may be saved
    const WRITABLE: bool = true;

    /// Adjust offsets into the container after strings or sections moved.
    fn rebase(&mut self, _ctx: &WriteContext<'_>) {}
}

macro_rules! primitive_record {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Record for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const NAME: &'static str = $name;
            }
        )+
    };
}

primitive_record! {
    u8 => "a u8 array",
    u16 => "a u16 array",
    u32 => "a u32 array",
    u64 => "a u64 array",
    i32 => "an i32 array",
}

/// A section made of `size / width` records.
///
/// Trailing bytes too short to hold another record are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deref, DerefMut, IntoIterator, Constructor)]
#[into_iterator(owned, ref, ref_mut)]
pub struct ArraySection<T> {
    pub values: Vec<T>,
}

impl<T> Default for ArraySection<T> {
    fn default() -> Self {
        ArraySection { values: Vec::new() }
    }
}

impl<T> From<Vec<T>> for ArraySection<T> {
    fn from(values: Vec<T>) -> Self {
        ArraySection { values }
    }
}

impl<T: Record> SectionCodec for ArraySection<T> {
    const NAME: &'static str = T::NAME;

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        let count = data.len() / T::WIDTH;
        let mut cursor = Cursor::new(data);

        let values = (0..count)
            .map(|_| T::read_options(&mut cursor, Endian::Little, ()))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        Ok(ArraySection { values })
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        if !T::WRITABLE {
            return Err(Error::ReadOnlySection(ctx.tag));
        }

        let mut cursor = Cursor::new(Vec::with_capacity(self.values.len() * T::WIDTH));
        for value in &self.values {
            let mut value = value.clone();
            if ctx.is_relocating() {
                value.rebase(ctx);
            }
            value.write_options(&mut cursor, Endian::Little, ())?;
        }

        Ok(cursor.into_inner())
    }
}

/// A section holding a single `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Constructor)]
pub struct CountSection {
    pub value: u32,
}

impl SectionCodec for CountSection {
    const NAME: &'static str = "a count";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::Truncated {
                offset: 0,
                needed: 4,
            });
        }

        Ok(CountSection {
            value: LittleEndian::read_u32(data),
        })
    }

    fn write(&self, _ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Ok(self.value.to_le_bytes().to_vec())
    }
}
