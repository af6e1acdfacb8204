//! The DAT1 tagged section container.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::io::{Cursor, Write};

use binrw::{BinRead, BinWrite};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::sections::serialized::{self, Extraction};
use crate::sections::{
    ArraySection, PriusEntry, ReadContext, Registry, Section, SectionVariant, VariantKind,
    WriteContext,
};
use crate::strings::{align, StringBlock};
use crate::tags;

/// "1TAD" read as a little endian `u32`
pub const DAT1_MAGIC: u32 = 0x44415431;

const HEADER_SIZE: usize = 16;
const ENTRY_SIZE: usize = 12;

/// Fixed header at the start of every container.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct Dat1Header {
    /// Always [`DAT1_MAGIC`]
    pub magic: u32,
    /// Kind of asset stored in the container
    pub type_magic: u32,
    /// Size of the whole container including padding
    pub size: u32,
    /// Number of directory entries following the header
    pub sections: u32,
}

/// One entry of the section directory.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct SectionEntry {
    pub tag: u32,
    /// Offset from the start of the container
    pub offset: u32,
    pub size: u32,
}

/// Summary of one section, as listed by [`Dat1::section_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    pub tag: u32,
    pub kind: VariantKind,
    /// Offset the section was loaded from or last saved at, `None` for sections added since
    pub original_offset: Option<u32>,
    /// Size of the section as loaded or last saved, 0 for sections added since
    pub size: usize,
    /// Whether the section will be encoded from its typed value on save
    pub modified: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    original_offset: Option<u32>,
    kind: VariantKind,
    raw: Vec<u8>,
    section: OnceCell<Section>,
    dirty: bool,
}

impl Entry {
    fn encode(
        &self,
        tag: u32,
        strings: &mut StringBlock,
        string_shift: i64,
        section_shifts: &[(u32, i64)],
    ) -> Result<Vec<u8>> {
        let mut ctx = WriteContext {
            tag,
            strings,
            string_shift,
            section_shifts,
        };
        let section = match self.section.get() {
            Some(section) if self.dirty || ctx.is_relocating() => section,
            _ => return Ok(self.raw.clone()),
        };

        match section.encode(&mut ctx) {
            Err(Error::ReadOnlySection(_)) if !self.dirty => {
                warn!(
                    "section {tag:#010X} is read-only and kept verbatim, string offsets inside it may be stale"
                );
                Ok(self.raw.clone())
            }
            result => result,
        }
    }
}

/// A DAT1 container.
///
/// Sections are decoded on first access through the [`Registry`] the container was parsed with.
/// Sections that were never borrowed mutably are written back byte for byte.
///
/// ```
/// use ovs_dat1::{Dat1, sections::CountSection};
///
/// let mut dat1 = Dat1::new(0x122BB0AB);
/// dat1.add_section(0xD540A903, CountSection::new(3))?;
///
/// let bytes = dat1.save()?;
/// let parsed = Dat1::parse(&bytes)?;
/// assert_eq!(parsed.section::<CountSection>(0xD540A903)?.value, 3);
/// # Ok::<(), ovs_dat1::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dat1 {
    type_magic: u32,
    strings: StringBlock,
    sections: IndexMap<u32, Entry>,
}

impl Dat1 {
    /// An empty container for the given asset kind.
    pub fn new(type_magic: u32) -> Self {
        Dat1 {
            type_magic,
            strings: StringBlock::new(HEADER_SIZE as u32, Vec::new()),
            sections: IndexMap::new(),
        }
    }

    /// Parse a container, decoding known tags with [`Registry::default`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &Registry::default())
    }

    /// Parse a container with a custom tag registry.
    #[instrument(skip_all, fields(len = data.len()))]
    pub fn parse_with(data: &[u8], registry: &Registry) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: HEADER_SIZE - data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let header = Dat1Header::read(&mut cursor)?;
        if header.magic != DAT1_MAGIC {
            return Err(Error::InvalidMagic(header.magic));
        }

        let directory_end = HEADER_SIZE + header.sections as usize * ENTRY_SIZE;
        if directory_end > data.len() {
            return Err(Error::Truncated {
                offset: data.len(),
                needed: directory_end - data.len(),
            });
        }

        let entries = (0..header.sections)
            .map(|_| SectionEntry::read(&mut cursor))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let mut strings_end = (header.size as usize).clamp(directory_end, data.len());
        let mut sections = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let start = entry.offset as usize;
            let end = start + entry.size as usize;
            if end > data.len() || (entry.size > 0 && start < directory_end) {
                return Err(Error::SectionOutOfBounds {
                    tag: entry.tag,
                    start,
                    end,
                    len: data.len(),
                });
            }
            if sections.contains_key(&entry.tag) {
                return Err(Error::DuplicateSection(entry.tag));
            }
            if entry.size > 0 {
                strings_end = strings_end.min(start);
            }

            sections.insert(
                entry.tag,
                Entry {
                    original_offset: Some(entry.offset),
                    kind: registry.kind_of(entry.tag),
                    raw: data[start..end].to_vec(),
                    section: OnceCell::new(),
                    dirty: false,
                },
            );
        }

        debug!(
            "parsed DAT1 {:#010X} with {} sections and {} bytes of strings",
            header.type_magic,
            sections.len(),
            strings_end - directory_end
        );

        Ok(Dat1 {
            type_magic: header.type_magic,
            strings: StringBlock::new(
                directory_end as u32,
                data[directory_end..strings_end].to_vec(),
            ),
            sections,
        })
    }

    /// Kind of asset stored in the container
    pub fn type_magic(&self) -> u32 {
        self.type_magic
    }

    pub fn set_type_magic(&mut self, type_magic: u32) {
        self.type_magic = type_magic;
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the container has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section tags in directory order
    pub fn tags(&self) -> impl Iterator<Item = u32> + '_ {
        self.sections.keys().copied()
    }

    pub fn has_section(&self, tag: u32) -> bool {
        self.sections.contains_key(&tag)
    }

    /// Offset a section had in the bytes this container was parsed from or last saved to.
    pub fn original_offset(&self, tag: u32) -> Option<u32> {
        self.sections.get(&tag).and_then(|e| e.original_offset)
    }

    /// Bytes a section had when the container was parsed or last saved.
    pub fn raw_section(&self, tag: u32) -> Option<&[u8]> {
        self.sections.get(&tag).map(|e| e.raw.as_slice())
    }

    /// Describe every section in directory order.
    pub fn section_info(&self) -> impl Iterator<Item = SectionInfo> + '_ {
        self.sections.iter().map(|(tag, entry)| SectionInfo {
            tag: *tag,
            kind: entry.kind,
            original_offset: entry.original_offset,
            size: entry.raw.len(),
            modified: entry.dirty,
        })
    }

    /// Decode a section (once) and return it untyped.
    pub fn materialize(&self, tag: u32) -> Result<&Section> {
        let entry = self
            .sections
            .get(&tag)
            .ok_or(Error::SectionNotFound(tag))?;
        if let Some(section) = entry.section.get() {
            return Ok(section);
        }

        let ctx = ReadContext {
            tag,
            original_offset: entry.original_offset.unwrap_or_default(),
            strings: &self.strings,
        };
        let section = Section::decode(entry.kind, &entry.raw, &ctx)?;
        debug!("decoded section {tag:#010X} as {}", section.name());

        Ok(entry.section.get_or_init(|| section))
    }

    /// Borrow a section as a specific variant.
    pub fn section<T: SectionVariant>(&self, tag: u32) -> Result<&T> {
        let section = self.materialize(tag)?;
        T::from_section(section).ok_or(Error::TypeMismatch {
            tag,
            expected: T::NAME,
            found: section.name(),
        })
    }

    /// Borrow a section mutably as a specific variant.
    ///
    /// The section is encoded from its typed value on the next save.
    pub fn section_mut<T: SectionVariant>(&mut self, tag: u32) -> Result<&mut T> {
        let found = self.materialize(tag)?.name();

        let entry = self
            .sections
            .get_mut(&tag)
            .ok_or(Error::SectionNotFound(tag))?;
        let section = entry
            .section
            .get_mut()
            .and_then(T::from_section_mut)
            .ok_or(Error::TypeMismatch {
                tag,
                expected: T::NAME,
                found,
            })?;

        entry.dirty = true;
        Ok(section)
    }

    /// Like [`Dat1::section`], with every failure folded into `None`.
    pub fn get<T: SectionVariant>(&self, tag: u32) -> Option<&T> {
        self.section(tag).ok()
    }

    /// Append a new section at the end of the directory.
    pub fn add_section(&mut self, tag: u32, section: impl Into<Section>) -> Result<()> {
        if self.has_section(tag) {
            return Err(Error::DuplicateSection(tag));
        }
        self.insert_section(tag, section);
        Ok(())
    }

    /// Add a section or replace the one stored under `tag`, keeping its directory position.
    ///
    /// Returns whether a section was replaced.
    pub fn insert_section(&mut self, tag: u32, section: impl Into<Section>) -> bool {
        let section = section.into();
        let kind = section.kind();

        match self.sections.get_mut(&tag) {
            Some(entry) => {
                entry.kind = kind;
                entry.section = OnceCell::from(section);
                entry.dirty = true;
                true
            }
            None => {
                self.sections.insert(
                    tag,
                    Entry {
                        original_offset: None,
                        kind,
                        raw: Vec::new(),
                        section: OnceCell::from(section),
                        dirty: true,
                    },
                );
                false
            }
        }
    }

    /// Remove a section. Returns whether it existed.
    pub fn remove_section(&mut self, tag: u32) -> bool {
        self.sections.shift_remove(&tag).is_some()
    }

    /// Container level strings
    pub fn strings(&self) -> &StringBlock {
        &self.strings
    }

    /// Read a string of the container block by absolute offset.
    pub fn string_at(&self, offset: u32) -> Option<&str> {
        self.strings.get(offset)
    }

    /// Intern a string into the container block, returning its absolute offset.
    ///
    /// Offsets are only stable until the directory changes size.
    pub fn add_string(&mut self, value: &str) -> u32 {
        self.strings.add(value)
    }

    /// Drop every container string.
    pub fn reset_strings(&mut self) {
        self.strings.clear();
    }

    /// Decode a structured blob embedded in a section.
    ///
    /// `offset` is counted from the start of the container as it was loaded or last saved, so the
    /// blob is located with the section's original offset and original bytes.
    pub fn extract_structured(&self, tag: u32, offset: u32, size: u32) -> Extraction {
        if size == 0 {
            return Extraction::Absent;
        }

        let Some(entry) = self.sections.get(&tag) else {
            return Extraction::Invalid(Error::SectionNotFound(tag));
        };
        let origin = entry.original_offset.unwrap_or_default() as usize;

        let start = (offset as usize).wrapping_sub(origin);
        let end = start.saturating_add(size as usize);
        if (offset as usize) < origin || end > entry.raw.len() {
            return Extraction::Invalid(Error::SectionOutOfBounds {
                tag,
                start: offset as usize,
                end: offset as usize + size as usize,
                len: origin + entry.raw.len(),
            });
        }

        match serialized::decode(&entry.raw[start..end], &self.strings) {
            Ok(value) => Extraction::Data(value),
            Err(err) => {
                debug!("structured data at {offset:#X} in {tag:#010X} is invalid: {err}");
                Extraction::Invalid(err)
            }
        }
    }

    /// Move the property names of the blobs inside "Actor Prius Built Data" along with the
    /// string block. Blobs that do not decode are left as they are.
    fn rebase_prius_data(&self, payloads: &mut [Vec<u8>], string_shift: i64) {
        let Some((index, _, data)) = self.sections.get_full(&tags::actor::PRIUS_BUILT_DATA) else {
            return;
        };
        if data.dirty {
            return;
        }
        let Some(origin) = data.original_offset else {
            return;
        };
        let Ok(table) = self.section::<ArraySection<PriusEntry>>(tags::actor::PRIUS_BUILT) else {
            return;
        };

        let mut patched = HashSet::new();
        for entry in table.iter().filter(|e| e.size != 0) {
            let Some(start) = entry.offset.checked_sub(origin) else {
                continue;
            };
            if !patched.insert(start) {
                continue;
            }

            let (start, end) = (start as usize, start as usize + entry.size as usize);
            let Some(blob) = payloads[index].get_mut(start..end) else {
                continue;
            };
            if let Err(err) = serialized::rebase_names(blob, &self.strings, string_shift) {
                debug!("prius blob at {:#X} keeps its names: {err}", entry.offset);
            }
        }
    }

    /// Serialize the container.
    ///
    /// Sections are laid out in the order they were loaded in, followed by added sections, each
    /// padded to 16 bytes. Afterwards the container describes the bytes it returned: original
    /// offsets and raw spans are those of the new layout.
    #[instrument(skip_all, fields(type_magic = self.type_magic, sections = self.sections.len()))]
    pub fn save(&mut self) -> Result<Vec<u8>> {
        let directory_end = HEADER_SIZE + self.sections.len() * ENTRY_SIZE;
        let string_shift = directory_end as i64 - i64::from(self.strings.base());

        if string_shift != 0 {
            // string offsets inside decoded sections are rebased while encoding
            let tags: Vec<u32> = self.tags().collect();
            for tag in tags {
                self.materialize(tag)?;
            }
        }

        let mut strings = self.strings.clone();
        strings.set_base(directory_end as u32);

        let mut payloads = Vec::with_capacity(self.sections.len());
        for (tag, entry) in self.sections.iter() {
            payloads.push(entry.encode(*tag, &mut strings, string_shift, &[])?);
        }

        if string_shift != 0 {
            self.rebase_prius_data(&mut payloads, string_shift);
        }

        let mut order: Vec<usize> = (0..self.sections.len()).collect();
        order.sort_by_key(|i| {
            self.sections[*i]
                .original_offset
                .map_or(u64::MAX, u64::from)
        });

        let mut offsets = vec![0usize; payloads.len()];
        let mut offset = align(directory_end + strings.as_bytes().len(), 4);
        for i in &order {
            offsets[*i] = offset;
            offset = align(offset + payloads[*i].len(), 16);
        }
        let total = offset;
        if total > u32::MAX as usize {
            return Err(Error::Unrepresentable(format!(
                "a DAT1 container can not hold {total} bytes"
            )));
        }

        let section_shifts: Vec<(u32, i64)> = self
            .sections
            .iter()
            .zip(&offsets)
            .filter_map(|((tag, entry), offset)| {
                let original = i64::from(entry.original_offset?);
                Some((*tag, *offset as i64 - original))
            })
            .filter(|(_, shift)| *shift != 0)
            .collect();

        if !section_shifts.is_empty() {
            for (i, (tag, entry)) in self.sections.iter().enumerate() {
                if !entry.kind.follows_sections() {
                    continue;
                }

                self.materialize(*tag)?;
                let payload = entry.encode(*tag, &mut strings, string_shift, &section_shifts)?;
                if payload.len() != payloads[i].len() {
                    return Err(Error::Unrepresentable(format!(
                        "section {tag:#010X} changed size while following moved sections"
                    )));
                }
                payloads[i] = payload;
            }
        }

        let mut cursor = Cursor::new(Vec::with_capacity(total));
        Dat1Header {
            magic: DAT1_MAGIC,
            type_magic: self.type_magic,
            size: total as u32,
            sections: self.sections.len() as u32,
        }
        .write(&mut cursor)?;
        for (i, tag) in self.sections.keys().enumerate() {
            SectionEntry {
                tag: *tag,
                offset: offsets[i] as u32,
                size: payloads[i].len() as u32,
            }
            .write(&mut cursor)?;
        }
        cursor.write_all(strings.as_bytes())?;

        let mut data = cursor.into_inner();
        for i in order {
            data.resize(offsets[i], 0);
            data.extend_from_slice(&payloads[i]);
        }
        data.resize(total, 0);

        let relocated = string_shift != 0 || !section_shifts.is_empty();
        for ((entry, payload), offset) in self.sections.values_mut().zip(payloads).zip(offsets) {
            entry.raw = payload;
            entry.original_offset = Some(offset as u32);
            entry.dirty = false;
            if relocated {
                entry.section = OnceCell::new();
            }
        }
        self.strings = strings;

        debug!("saved DAT1 of {total} bytes");
        Ok(data)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::Dat1;
    use crate::error::{Error, Result};
    use crate::sections::{ArraySection, CountSection, RawSection, Registry, VariantKind};
    use crate::strings::StringTable;
    use crate::tags::localization;

    #[rustfmt::skip]
    const TWO_SECTIONS: [u8; 80] = [
        0x31, 0x54, 0x41, 0x44, // 1TAD
        0xAB, 0xB0, 0x2B, 0x12, // type magic
        0x50, 0x00, 0x00, 0x00, // size
        0x02, 0x00, 0x00, 0x00, // sections
        // directory
        0x03, 0xA9, 0x40, 0xD5, 0x30, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        0xEF, 0xBE, 0xAD, 0xDE, 0x40, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
        // strings
        b'n', b'a', b'm', b'e', 0x00, 0x00, 0x00, 0x00,
        // count
        0x05, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        // raw
        0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn parse_directory() -> Result<()> {
        let dat1 = Dat1::parse(&TWO_SECTIONS)?;

        assert_eq!(dat1.type_magic(), localization::MAGIC);
        assert_eq!(
            dat1.tags().collect::<Vec<_>>(),
            vec![localization::ENTRIES_COUNT, 0xDEADBEEF]
        );
        assert_eq!(dat1.original_offset(0xDEADBEEF), Some(0x40));
        assert_eq!(dat1.string_at(0x28), Some("name"));
        assert_eq!(
            dat1.section::<CountSection>(localization::ENTRIES_COUNT)?
                .value,
            5
        );
        assert_eq!(
            dat1.section::<RawSection>(0xDEADBEEF)?.0,
            vec![0x01, 0x02, 0x03]
        );

        Ok(())
    }

    #[test]
    fn untouched_container_is_byte_identical() -> Result<()> {
        let mut dat1 = Dat1::parse(&TWO_SECTIONS)?;
        dat1.section::<CountSection>(localization::ENTRIES_COUNT)?;

        assert_eq!(dat1.save()?, TWO_SECTIONS.to_vec());

        Ok(())
    }

    #[test]
    fn type_mismatch_and_missing() -> Result<()> {
        let dat1 = Dat1::parse(&TWO_SECTIONS)?;

        assert!(matches!(
            dat1.section::<StringTable>(localization::ENTRIES_COUNT),
            Err(Error::TypeMismatch {
                expected: "a string table",
                found: "a count",
                ..
            })
        ));
        assert!(matches!(
            dat1.section::<CountSection>(0x12345678),
            Err(Error::SectionNotFound(0x12345678))
        ));
        assert!(dat1.get::<CountSection>(0x12345678).is_none());

        Ok(())
    }

    #[test]
    fn invalid_magic() {
        let mut input = TWO_SECTIONS;
        input[0] = b'2';

        assert!(matches!(
            Dat1::parse(&input),
            Err(Error::InvalidMagic(0x44415432))
        ));
    }

    #[test]
    fn truncated_directory() {
        assert!(matches!(
            Dat1::parse(&TWO_SECTIONS[..30]),
            Err(Error::Truncated { .. })
        ));
        assert!(matches!(
            Dat1::parse(&TWO_SECTIONS[..8]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn section_outside_buffer() {
        let mut input = TWO_SECTIONS;
        input[36] = 0x40; // raw section size 0x40

        assert!(matches!(
            Dat1::parse(&input),
            Err(Error::SectionOutOfBounds {
                tag: 0xDEADBEEF,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_tag() {
        let mut input = TWO_SECTIONS;
        input[28..32].copy_from_slice(&localization::ENTRIES_COUNT.to_le_bytes());

        assert!(matches!(
            Dat1::parse(&input),
            Err(Error::DuplicateSection(localization::ENTRIES_COUNT))
        ));
    }

    #[test]
    fn mutation_is_saved() -> Result<()> {
        let mut dat1 = Dat1::parse(&TWO_SECTIONS)?;
        dat1.section_mut::<CountSection>(localization::ENTRIES_COUNT)?
            .value = 9;

        let bytes = dat1.save()?;
        assert_eq!(bytes.len(), TWO_SECTIONS.len());
        assert_eq!(bytes[0x30..0x34], [0x09, 0x00, 0x00, 0x00]);

        Ok(())
    }

    #[test]
    #[traced_test]
    fn added_sections_move_strings() -> Result<()> {
        let mut dat1 = Dat1::parse(&TWO_SECTIONS)?;
        dat1.add_section(
            localization::FLAGS,
            ArraySection::new(vec![1u8, 2, 3, 4]),
        )?;
        assert!(matches!(
            dat1.add_section(localization::FLAGS, RawSection::default()),
            Err(Error::DuplicateSection(_))
        ));

        let bytes = dat1.save()?;
        let parsed = Dat1::parse(&bytes)?;

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.strings().base(), 16 + 3 * 12);
        assert_eq!(parsed.string_at(16 + 3 * 12), Some("name"));
        assert_eq!(
            parsed.section::<ArraySection<u8>>(localization::FLAGS)?.values,
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            parsed.section::<RawSection>(0xDEADBEEF)?.0,
            vec![0x01, 0x02, 0x03]
        );
        assert_eq!(bytes.len() % 16, 0);
        assert_eq!(parsed.original_offset(localization::ENTRIES_COUNT), Some(60));
        assert_eq!(parsed.original_offset(0xDEADBEEF), Some(64));
        assert_eq!(parsed.original_offset(localization::FLAGS), Some(80));

        Ok(())
    }

    #[test]
    fn saves_describe_the_new_layout() -> Result<()> {
        let mut dat1 = Dat1::parse(&TWO_SECTIONS)?;
        dat1.add_section(localization::FLAGS, ArraySection::new(vec![7u8]))?;

        let first = dat1.save()?;
        assert_eq!(dat1.save()?, first);

        assert_eq!(dat1.strings().base(), 16 + 3 * 12);
        assert_eq!(dat1.string_at(16 + 3 * 12), Some("name"));
        assert_eq!(dat1.original_offset(localization::FLAGS), Some(80));
        assert_eq!(dat1.raw_section(localization::FLAGS), Some([7u8].as_slice()));
        assert!(dat1.section_info().all(|info| !info.modified));

        Ok(())
    }

    #[test]
    fn remove_and_replace() -> Result<()> {
        let mut dat1 = Dat1::parse(&TWO_SECTIONS)?;

        assert!(dat1.insert_section(0xDEADBEEF, CountSection::new(1)));
        assert!(dat1.remove_section(localization::ENTRIES_COUNT));
        assert!(!dat1.remove_section(localization::ENTRIES_COUNT));

        let parsed = Dat1::parse_with(&dat1.save()?, &Registry::empty())?;
        assert_eq!(parsed.tags().collect::<Vec<_>>(), vec![0xDEADBEEF]);
        assert_eq!(
            parsed.section_info().next().map(|i| i.kind),
            Some(VariantKind::Raw)
        );
        assert_eq!(
            parsed.raw_section(0xDEADBEEF),
            Some([0x01, 0x00, 0x00, 0x00].as_slice())
        );

        Ok(())
    }

    #[test]
    fn empty_container() -> Result<()> {
        let mut dat1 = Dat1::new(0x35F7AFA5);

        #[rustfmt::skip]
        assert_eq!(dat1.save()?, vec![
            0x31, 0x54, 0x41, 0x44,
            0xA5, 0xAF, 0xF7, 0x35,
            0x10, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        Ok(())
    }
}
