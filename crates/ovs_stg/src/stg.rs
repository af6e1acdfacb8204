//! The STG envelope.

use std::io::{Cursor, Write};

use binrw::{BinRead, BinWrite};
use bon::Builder;
use byteorder::{ByteOrder, LittleEndian};
use ovs_dat1::Dat1;
use tracing::{debug, instrument};

use crate::config::ConfigAsset;
use crate::error::{Error, Result};
use crate::header::AssetHeader;
use crate::index::AssetIndex;

/// "STG" in the low 24 bits of the first `u32`
pub const STG_MAGIC: u32 = 0x475453;

const PREFIX_SIZE: usize = 16;
const ALIGNMENT: usize = 16;

/// Bits of [`Stg::flags`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StgFlag {
    /// The header block is installed with the asset
    InstallHeader = 1 << 0,
    /// The texture meta block is installed with the asset
    InstallTextureMeta = 1 << 1,
}

#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
struct StgPrefix {
    magic_and_version: u32,
    flags: u32,
    header_size: u32,
    texture_meta_size: u32,
}

/// Options for how an STG should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct SaveOptions {
    /// Emit the bare payload when there is neither a header nor texture meta
    #[builder(default = true)]
    pub pack_raw_if_no_extras: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions::builder().build()
    }
}

fn align(value: usize) -> usize {
    value.div_ceil(ALIGNMENT) * ALIGNMENT
}

fn block(data: &[u8], start: usize, size: usize) -> Result<&[u8]> {
    data.get(start..start + size).ok_or(Error::Truncated {
        offset: start,
        needed: size,
    })
}

/// A single asset, optionally wrapped with its header and texture meta blocks.
///
/// ```
/// use ovs_stg::{SaveOptions, Stg};
///
/// let mut stg = Stg::load(b"not a dat1", true)?;
/// assert!(stg.dat1().is_none());
/// assert_eq!(stg.save(SaveOptions::default())?, b"not a dat1");
///
/// stg.set_texture_meta(Some(vec![1, 2, 3]));
/// let wrapped = stg.save(SaveOptions::default())?;
/// assert_eq!(wrapped.len(), 16 + 16 + 10);
/// # Ok::<(), ovs_stg::error::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stg {
    version: u8,
    flags: u32,
    header: Option<Vec<u8>>,
    texture_meta: Option<Vec<u8>>,
    raw: Vec<u8>,
    dat1: Option<Dat1>,
}

impl Stg {
    /// An unwrapped asset around a payload.
    pub fn from_raw(raw: Vec<u8>) -> Self {
        let mut stg = Stg {
            raw,
            ..Default::default()
        };
        stg.try_dat1();
        stg
    }

    /// Load a wrapped or, if `allow_raw` is set, bare asset.
    ///
    /// A payload that does not parse as a DAT1 is kept as raw bytes only.
    #[instrument(skip(data), fields(len = data.len()))]
    pub fn load(data: &[u8], allow_raw: bool) -> Result<Self> {
        match data.get(..4).map(LittleEndian::read_u32) {
            Some(value) if value & 0xFFFFFF == STG_MAGIC => Self::load_wrapped(data),
            _ if allow_raw => {
                debug!("no STG magic, treating the stream as a bare asset");
                Ok(Stg::from_raw(data.to_vec()))
            }
            _ => Err(Error::NotWrapped),
        }
    }

    fn load_wrapped(data: &[u8]) -> Result<Self> {
        let version = data[3];
        if version != 0 {
            return Err(Error::UnsupportedVersion(version));
        }

        block(data, 0, PREFIX_SIZE)?;
        let prefix = StgPrefix::read(&mut Cursor::new(data))?;

        let mut offset = PREFIX_SIZE;
        let header = block(data, offset, prefix.header_size as usize)?;
        offset = align(offset + header.len());
        let texture_meta = block(data, offset, prefix.texture_meta_size as usize)?;
        offset = align(offset + texture_meta.len());

        let non_empty = |bytes: &[u8]| (!bytes.is_empty()).then(|| bytes.to_vec());
        let mut stg = Stg {
            version,
            flags: prefix.flags,
            header: non_empty(header),
            texture_meta: non_empty(texture_meta),
            raw: data.get(offset..).unwrap_or_default().to_vec(),
            dat1: None,
        };
        stg.try_dat1();
        Ok(stg)
    }

    /// Load an asset out of an archive index, with the blocks the index stores for it.
    #[instrument(skip(index))]
    pub fn from_index(index: &impl AssetIndex, span: u8, asset_id: u64) -> Result<Self> {
        let i = index
            .find(span, asset_id)
            .ok_or(Error::AssetNotFound { span, asset_id })?;

        let mut stg = Stg::from_raw(index.extract(i)?);
        stg.header = index.header(i);
        stg.texture_meta = index.texture_meta(i);
        stg.set_flag(StgFlag::InstallHeader, stg.header.is_some());
        stg.set_flag(StgFlag::InstallTextureMeta, stg.texture_meta.is_some());
        Ok(stg)
    }

    /// A new config asset of the given type, see [`ConfigAsset::new`].
    pub fn config(type_name: &str) -> Result<ConfigAsset> {
        ConfigAsset::new(type_name)
    }

    fn try_dat1(&mut self) {
        self.dat1 = match Dat1::parse(&self.raw) {
            Ok(dat1) => Some(dat1),
            Err(err) => {
                debug!("payload is not a DAT1: {err}");
                None
            }
        };
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn has_flag(&self, flag: StgFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    pub fn set_flag(&mut self, flag: StgFlag, on: bool) {
        if on {
            self.flags |= flag as u32;
        } else {
            self.flags &= !(flag as u32);
        }
    }

    /// Parsed header block, if there is one
    pub fn header(&self) -> Result<Option<AssetHeader>> {
        self.header.as_deref().map(AssetHeader::parse).transpose()
    }

    /// Replace the header block.
    pub fn set_header(&mut self, header: Option<&AssetHeader>) -> Result<()> {
        self.header = header.map(AssetHeader::to_bytes).transpose()?;
        Ok(())
    }

    pub fn raw_header(&self) -> Option<&[u8]> {
        self.header.as_deref()
    }

    pub fn set_raw_header(&mut self, header: Option<Vec<u8>>) {
        self.header = header;
    }

    pub fn texture_meta(&self) -> Option<&[u8]> {
        self.texture_meta.as_deref()
    }

    pub fn set_texture_meta(&mut self, texture_meta: Option<Vec<u8>>) {
        self.texture_meta = texture_meta;
    }

    /// Payload as it was loaded or last saved
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Replace the payload. The DAT1 view is kept; call [`Stg::clear_dat1`] to save these bytes as
    /// they are.
    pub fn set_raw(&mut self, raw: Vec<u8>) {
        self.raw = raw;
    }

    pub fn dat1(&self) -> Option<&Dat1> {
        self.dat1.as_ref()
    }

    pub fn dat1_mut(&mut self) -> Option<&mut Dat1> {
        self.dat1.as_mut()
    }

    pub fn set_dat1(&mut self, dat1: Option<Dat1>) {
        self.dat1 = dat1;
    }

    /// Remove the DAT1 view so the next save writes the raw payload unchanged.
    pub fn clear_dat1(&mut self) -> Option<Dat1> {
        self.dat1.take()
    }

    /// Whether a header or texture meta block is present
    pub fn has_extras(&self) -> bool {
        self.header.is_some() || self.texture_meta.is_some()
    }

    /// Serialize the asset.
    ///
    /// The payload is regenerated from the DAT1 view when there is one.
    #[instrument(skip(self))]
    pub fn save(&mut self, options: SaveOptions) -> Result<Vec<u8>> {
        if let Some(dat1) = &mut self.dat1 {
            self.raw = dat1.save()?;
        }

        let mut out = Cursor::new(Vec::new());
        if self.has_extras() || !options.pack_raw_if_no_extras {
            let header = self.header.as_deref().unwrap_or_default();
            let texture_meta = self.texture_meta.as_deref().unwrap_or_default();
            StgPrefix {
                magic_and_version: STG_MAGIC | (u32::from(self.version) << 24),
                flags: self.flags,
                header_size: header.len() as u32,
                texture_meta_size: texture_meta.len() as u32,
            }
            .write(&mut out)?;

            for data in [header, texture_meta] {
                out.write_all(data)?;
                let position = out.get_ref().len();
                out.get_mut().resize(align(position), 0);
                out.set_position(align(position) as u64);
            }
        }

        out.write_all(&self.raw)?;
        Ok(out.into_inner())
    }
}
