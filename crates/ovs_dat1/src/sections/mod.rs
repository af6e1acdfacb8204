//! Typed representations of DAT1 section payloads.
//!
//! Every section of a container decodes to one variant of the closed [`Section`] enum. Which variant
//! a tag decodes to is decided by a [`Registry`]; tags the registry does not know stay [`RawSection`].
//!
//! | Variant              | Payload                                               | Writable |
//! |----------------------|-------------------------------------------------------|----------|
//! | `Raw`                | opaque bytes                                          | yes      |
//! | `U8Array`..`U64Array`| packed little endian integers                         | yes      |
//! | `Count`              | a single `u32`                                        | yes      |
//! | `Strings`            | [`StringTable`]                                       | yes      |
//! | `Serialized`         | [`SerializedSection`], a structured key/value tree    | yes      |
//! | `References`         | 16 byte [`Reference`] records                         | yes      |
//! | `TextureHeader`      | [`TextureHeader`]                                     | no       |
//! | `MaterialData`       | [`MaterialData`]                                      | no       |
//! | `ModelMaterials`     | [`ModelMaterials`]                                    | no       |
//! | `SoundbankInfo`      | 16 byte [`SoundbankEvent`] records                    | no       |
//! | `StreamLookup`       | 8 byte [`StreamLookup`] records                       | yes      |
//! | `WwiseAssets`        | 12 byte [`WwiseAsset`] records                        | yes      |
//! | `WwiseEvents`        | 36 byte [`WwiseEvent`] records                        | yes      |
//! | `ActorObject`        | [`ActorObject`]                                       | yes      |
//! | `PriusEntries`       | 32 byte [`PriusEntry`] records                        | yes      |
//! | `I32Array`           | packed little endian `i32`, level zone indices        | yes      |
//! | `LevelBuilt`         | [`LevelBuilt`] table counts                           | yes      |
//! | `Level*` arrays      | embedded zones, links, regions, zones and groups      | yes      |
//! | `ZoneHibernateObjects` | [`ZoneHibernateObjects`] groups and items           | no       |

use std::collections::HashMap;

use crate::error::Result;
use crate::strings::{StringBlock, StringTable};
use crate::tags;

mod actor;
mod array;
mod level;
mod material;
mod model;
mod raw;
mod references;
pub mod serialized;
mod soundbank;
mod texture;
mod wwise;
mod zone;

pub use actor::{ActorObject, PriusEntry};
pub use array::{ArraySection, CountSection, Record};
pub use level::{
    EmbeddedZone, LevelBuilt, LevelGroup, LevelLink, LevelNamedBlock, LevelRegion, LevelZone,
    RandomListEntry, ZoneIndexGroup,
};
pub use material::{MaterialData, MaterialTexture};
pub use model::{ModelMaterial, ModelMaterials};
pub use raw::RawSection;
pub use references::Reference;
pub use serialized::SerializedSection;
pub use soundbank::{SoundbankEvent, StreamLookup};
pub use texture::TextureHeader;
pub use wwise::{WwiseAsset, WwiseEvent};
pub use zone::{HibernateGroup, HibernateHeader, HibernateItem, HibernateObjects, ZoneHibernateObjects};

/// Everything a decoder may consult besides its own bytes.
#[derive(Debug, Clone, Copy)]
pub struct ReadContext<'a> {
    /// Tag of the section being decoded
    pub tag: u32,
    /// Offset of the section inside the container it was loaded from
    pub original_offset: u32,
    /// Container level string block
    pub strings: &'a StringBlock,
}

/// Everything an encoder may touch besides its own value.
#[derive(Debug)]
pub struct WriteContext<'a> {
    /// Tag of the section being encoded
    pub tag: u32,
    /// Container level string block, new names are interned here
    pub strings: &'a mut StringBlock,
    /// How far the string block moved since the section was loaded
    pub string_shift: i64,
    /// How far other sections moved since the section was loaded, by tag
    pub section_shifts: &'a [(u32, i64)],
}

impl<'a> WriteContext<'a> {
    /// Context for a container laid out exactly as it was loaded.
    pub fn new(tag: u32, strings: &'a mut StringBlock) -> Self {
        WriteContext {
            tag,
            strings,
            string_shift: 0,
            section_shifts: &[],
        }
    }

    /// Whether anything a section may point at moved.
    pub fn is_relocating(&self) -> bool {
        self.string_shift != 0 || self.section_shifts.iter().any(|(_, shift)| *shift != 0)
    }

    /// How far the section stored under `tag` moved, 0 when it did not or is unknown.
    pub fn section_shift(&self, tag: u32) -> i64 {
        self.section_shifts
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(0, |(_, shift)| *shift)
    }
}

/// Decoder and encoder for one section payload layout.
pub trait SectionCodec: Sized {
    /// Human readable name used in diagnostics
    const NAME: &'static str;

    /// Decode a section from its raw bytes.
    fn read(data: &[u8], ctx: &ReadContext<'_>) -> Result<Self>;

    /// Encode the section back into bytes.
    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>>;
}

/// Types that are the payload of exactly one [`Section`] variant.
pub trait SectionVariant: SectionCodec {
    fn from_section(section: &Section) -> Option<&Self>;
    fn from_section_mut(section: &mut Section) -> Option<&mut Self>;
}

macro_rules! sections {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A decoded section payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Section {
            $($variant($ty)),+
        }

        /// Discriminant of [`Section`], used by the [`Registry`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum VariantKind {
            $($variant),+
        }

        impl Section {
            /// Variant of this section
            pub fn kind(&self) -> VariantKind {
                match self {
                    $(Section::$variant(_) => VariantKind::$variant),+
                }
            }

            /// Human readable name of the variant
            pub fn name(&self) -> &'static str {
                match self {
                    $(Section::$variant(_) => <$ty as SectionCodec>::NAME),+
                }
            }

            /// Decode raw bytes as the given variant.
            pub fn decode(kind: VariantKind, data: &[u8], ctx: &ReadContext<'_>) -> Result<Self> {
                match kind {
                    $(VariantKind::$variant => Ok(Section::$variant(<$ty as SectionCodec>::read(data, ctx)?))),+
                }
            }

            /// Encode the section into its on-disk bytes.
            pub fn encode(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
                match self {
                    $(Section::$variant(value) => value.write(ctx)),+
                }
            }
        }

        $(
            impl From<$ty> for Section {
                fn from(value: $ty) -> Self {
                    Section::$variant(value)
                }
            }

            impl SectionVariant for $ty {
                fn from_section(section: &Section) -> Option<&Self> {
                    match section {
                        Section::$variant(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_section_mut(section: &mut Section) -> Option<&mut Self> {
                    match section {
                        Section::$variant(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

sections! {
    Raw(RawSection),
    U8Array(ArraySection<u8>),
    U16Array(ArraySection<u16>),
    U32Array(ArraySection<u32>),
    U64Array(ArraySection<u64>),
    Count(CountSection),
    Strings(StringTable),
    Serialized(SerializedSection),
    References(ArraySection<Reference>),
    TextureHeader(TextureHeader),
    MaterialData(MaterialData),
    ModelMaterials(ModelMaterials),
    SoundbankInfo(ArraySection<SoundbankEvent>),
    StreamLookup(ArraySection<StreamLookup>),
    WwiseAssets(ArraySection<WwiseAsset>),
    WwiseEvents(ArraySection<WwiseEvent>),
    ActorObject(ActorObject),
    PriusEntries(ArraySection<PriusEntry>),
    I32Array(ArraySection<i32>),
    LevelBuilt(LevelBuilt),
    LevelEmbeddedZones(ArraySection<EmbeddedZone>),
    LevelLinks(ArraySection<LevelLink>),
    LevelRandomList(ArraySection<RandomListEntry>),
    LevelRegions(ArraySection<LevelRegion>),
    LevelNamedBlocks(ArraySection<LevelNamedBlock>),
    LevelGroups(ArraySection<LevelGroup>),
    LevelZoneIndexGroups(ArraySection<ZoneIndexGroup>),
    LevelZones(ArraySection<LevelZone>),
    ZoneHibernateObjects(ZoneHibernateObjects),
}

impl VariantKind {
    /// Whether payloads of this kind hold container offsets into other sections.
    ///
    /// Such sections are encoded a second time once the layout of a save is known.
    pub fn follows_sections(self) -> bool {
        matches!(self, VariantKind::PriusEntries)
    }
}

/// Maps section tags to the variant their payload decodes to.
///
/// [`Registry::default`] knows every tag in [`crate::tags`]. Unknown tags decode to
/// [`VariantKind::Raw`].
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: HashMap<u32, VariantKind>,
}

impl Registry {
    /// A registry that knows no tags at all.
    pub fn empty() -> Self {
        Registry {
            kinds: HashMap::new(),
        }
    }

    /// Register (or override) the variant for a tag.
    pub fn register(&mut self, tag: u32, kind: VariantKind) -> &mut Self {
        self.kinds.insert(tag, kind);
        self
    }

    /// Variant a tag decodes to.
    pub fn kind_of(&self, tag: u32) -> VariantKind {
        self.kinds.get(&tag).copied().unwrap_or(VariantKind::Raw)
    }
}

impl Default for Registry {
    fn default() -> Self {
        use tags::*;
        use VariantKind as K;

        let mut registry = Registry::empty();
        registry
            .register(config::TYPE, K::Serialized)
            .register(config::BUILT, K::Serialized)
            .register(config::REFERENCES, K::References)
            .register(localization::ENTRIES_COUNT, K::Count)
            .register(localization::KEYS_DATA, K::Strings)
            .register(localization::KEYS_OFFSETS, K::U32Array)
            .register(localization::VALUES_DATA, K::Strings)
            .register(localization::VALUES_OFFSETS, K::U32Array)
            .register(localization::FLAGS, K::U8Array)
            .register(localization::KEY_HASHES, K::U32Array)
            .register(localization::SORTED_HASHES, K::U32Array)
            .register(localization::SORTED_INDEXES, K::U16Array)
            .register(texture::HEADER, K::TextureHeader)
            .register(material::SERIALIZED_DATA, K::MaterialData)
            .register(model::MATERIAL, K::ModelMaterials)
            .register(soundbank::INFO, K::SoundbankInfo)
            .register(soundbank::STRINGS, K::Strings)
            .register(soundbank::STREAM_LOOKUP, K::StreamLookup)
            .register(wwise::ASSETS, K::WwiseAssets)
            .register(wwise::EVENTS, K::WwiseEvents)
            .register(actor::OBJECT_BUILT, K::ActorObject)
            .register(actor::PRIUS_BUILT, K::PriusEntries)
            .register(actor::PRIUS_BUILT_DATA, K::Raw)
            .register(level::BUILT, K::LevelBuilt)
            .register(level::EMBEDDED_ZONES, K::LevelEmbeddedZones)
            .register(level::LINK_DATA, K::LevelLinks)
            .register(level::RANDOM_LIST, K::LevelRandomList)
            .register(level::REGIONS_BUILT, K::LevelRegions)
            .register(level::ZONE_INDEXES, K::I32Array)
            .register(level::NAMED_BLOCKS, K::LevelNamedBlocks)
            .register(level::GROUPS, K::LevelGroups)
            .register(level::ZONE_INDEX_GROUPS, K::LevelZoneIndexGroups)
            .register(level::ZONES_BUILT, K::LevelZones)
            .register(zone::HIBERNATE_OBJECTS, K::ZoneHibernateObjects);
        registry
    }
}

impl SectionCodec for StringTable {
    const NAME: &'static str = "a string table";

    fn read(data: &[u8], _ctx: &ReadContext<'_>) -> Result<Self> {
        StringTable::read(data)
    }

    fn write(&self, _ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        Ok(self.to_bytes())
    }
}
