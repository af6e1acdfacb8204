//! Offset addressed string storage.
//!
//! Two flavours exist in a DAT1 file:
//!
//! * [`StringTable`] is the payload of a string section. Strings are NUL terminated and every string
//!   starts on a 4 byte boundary.
//! * [`StringBlock`] is the container level block sitting between the section directory and the first
//!   section. Strings are packed without padding and addressed by offsets relative to the start of the
//!   container.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::Result;

pub(crate) const fn align(value: usize, alignment: usize) -> usize {
    match value % alignment {
        0 => value,
        rem => value + alignment - rem,
    }
}

/// A blob of NUL terminated, 4 byte aligned UTF-8 strings.
///
/// ```
/// use ovs_dat1::strings::StringTable;
///
/// let mut table = StringTable::default();
/// let first = table.add("hello");
/// let second = table.add("world");
///
/// assert_eq!(first, 0);
/// assert_eq!(second, 8);
/// assert_eq!(table.get(second), Some("world"));
/// assert_eq!(table.to_bytes().len(), 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    by_offset: IndexMap<u32, String>,
    by_string: HashMap<String, u32>,
    end: usize,
}

impl StringTable {
    /// Parse a string table from the raw bytes of a section.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut table = StringTable::default();

        let mut cursor = 0usize;
        while cursor < data.len() {
            let end = data[cursor..]
                .iter()
                .position(|b| *b == 0)
                .map_or(data.len(), |p| cursor + p);

            let value = String::from_utf8(data[cursor..end].to_vec())?;
            table.insert(cursor as u32, value);

            // skip the terminator and any zero padding up to the next boundary
            cursor = end + 1;
            let boundary = align(cursor, 4).min(data.len());
            while cursor < boundary && data[cursor] == 0 {
                cursor += 1;
            }
        }

        table.end = data.len();
        Ok(table)
    }

    /// Serialize the table, placing every string at its recorded offset.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.end);
        for (offset, value) in &self.by_offset {
            data.resize(*offset as usize, 0);
            data.extend_from_slice(value.as_bytes());
            data.push(0);
        }
        data.resize(self.end.max(data.len()), 0);
        data
    }

    /// Append a string at the current end of the blob and return its offset.
    ///
    /// No deduplication happens here, check [`StringTable::offset_of`] first when that matters.
    pub fn add(&mut self, value: impl Into<String>) -> u32 {
        let value = value.into();
        let offset = align(self.end, 4);
        self.end = align(offset + value.len() + 1, 4);
        self.insert(offset as u32, value);
        offset as u32
    }

    /// String starting at `offset`, if one was recorded there.
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.by_offset.get(&offset).map(String::as_str)
    }

    /// Offset of a string, if it is present.
    pub fn offset_of(&self, value: &str) -> Option<u32> {
        self.by_string.get(value).copied()
    }

    /// Iterate over `(offset, string)` pairs in blob order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.by_offset.iter().map(|(o, s)| (*o, s.as_str()))
    }

    /// Number of strings in the table.
    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    /// Whether the table holds no strings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the serialized blob in bytes.
    pub fn byte_len(&self) -> usize {
        self.end
    }

    /// Drop every string and start over at offset 0.
    pub fn clear(&mut self) {
        self.by_offset.clear();
        self.by_string.clear();
        self.end = 0;
    }

    fn insert(&mut self, offset: u32, value: String) {
        self.by_string.insert(value.clone(), offset);
        self.by_offset.insert(offset, value);
    }
}

/// The container level string block.
///
/// Offsets handed out by this type are absolute, counted from the first byte of the DAT1 header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBlock {
    base: u32,
    data: Vec<u8>,
    by_string: HashMap<String, u32>,
}

impl StringBlock {
    /// Wrap the bytes found at `base` inside a container.
    pub fn new(base: u32, data: Vec<u8>) -> Self {
        let mut by_string = HashMap::new();
        let mut start = 0usize;
        for (i, b) in data.iter().enumerate() {
            if *b != 0 {
                continue;
            }
            if i > start {
                if let Ok(value) = std::str::from_utf8(&data[start..i]) {
                    by_string.entry(value.to_owned()).or_insert(start as u32);
                }
            }
            start = i + 1;
        }

        StringBlock {
            base,
            data,
            by_string,
        }
    }

    /// Absolute offset of the first byte of the block.
    pub fn base(&self) -> u32 {
        self.base
    }

    pub(crate) fn set_base(&mut self, base: u32) {
        self.base = base;
    }

    /// Raw bytes of the block.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the NUL terminated string starting at an absolute offset.
    ///
    /// The offset may point into the middle of a stored string, in which case its tail is returned.
    pub fn get(&self, offset: u32) -> Option<&str> {
        let start = offset.checked_sub(self.base)? as usize;
        if start >= self.data.len() {
            return None;
        }
        let end = self.data[start..]
            .iter()
            .position(|b| *b == 0)
            .map_or(self.data.len(), |p| start + p);
        std::str::from_utf8(&self.data[start..end]).ok()
    }

    /// Absolute offset of a string, if it is present.
    pub fn offset_of(&self, value: &str) -> Option<u32> {
        self.by_string.get(value).map(|rel| rel + self.base)
    }

    /// Intern a string, reusing an existing copy when there is one.
    pub fn add(&mut self, value: &str) -> u32 {
        if let Some(offset) = self.offset_of(value) {
            return offset;
        }

        let relative = self.data.len() as u32;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.by_string.insert(value.to_owned(), relative);
        relative + self.base
    }

    /// Drop all strings.
    pub fn clear(&mut self) {
        self.data.clear();
        self.by_string.clear();
    }

    /// Whether the block holds no strings
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{StringBlock, StringTable};
    use crate::error::Result;

    #[test]
    fn read_aligned_table() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'I', b'N', b'V', b'A', b'L', b'I', b'D', 0x00,
            0x00, 0x00, 0x00, 0x00,
            b'k', b'e', b'y', 0x00,
        ];

        let table = StringTable::read(&input)?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("INVALID"));
        assert_eq!(table.get(8), Some(""));
        assert_eq!(table.get(12), Some("key"));
        assert_eq!(table.offset_of("key"), Some(12));
        assert_eq!(table.to_bytes(), input.to_vec());

        Ok(())
    }

    #[test]
    fn read_packed_table() -> Result<()> {
        let input = b"ab\0cd\0";

        let table = StringTable::read(input)?;
        assert_eq!(table.get(0), Some("ab"));
        assert_eq!(table.get(3), Some("cd"));
        assert_eq!(table.to_bytes(), input.to_vec());

        Ok(())
    }

    #[test]
    fn add_keeps_alignment() {
        let mut table = StringTable::default();

        let offsets: Vec<u32> = ["a", "four", "", "seven77"]
            .into_iter()
            .map(|s| table.add(s))
            .collect();

        assert_eq!(offsets, vec![0, 4, 12, 16]);
        assert_eq!(table.byte_len() % 4, 0);
        for offset in offsets {
            assert_eq!(offset % 4, 0);
        }
    }

    #[test]
    fn add_after_packed_read_is_fresh() -> Result<()> {
        let mut table = StringTable::read(b"ab\0cd\0")?;

        let offset = table.add("ef");
        assert_eq!(offset, 8);
        assert_eq!(table.get(offset), Some("ef"));
        assert_eq!(table.get(3), Some("cd"));

        Ok(())
    }

    #[test]
    fn add_does_not_deduplicate() {
        let mut table = StringTable::default();
        let first = table.add("same");
        let second = table.add("same");

        assert_ne!(first, second);
        assert_eq!(table.get(first), Some("same"));
        assert_eq!(table.get(second), Some("same"));
        assert_eq!(table.offset_of("same"), Some(second));
    }

    #[test]
    fn read_write_roundtrip() -> Result<()> {
        let mut table = StringTable::default();
        table.add("menu_title");
        table.add("");
        table.add("Hello, World!");

        let bytes = table.to_bytes();
        assert_eq!(StringTable::read(&bytes)?, table);
        assert_eq!(StringTable::read(&bytes)?.to_bytes(), bytes);

        Ok(())
    }

    #[test]
    fn block_offsets_are_absolute() {
        let mut block = StringBlock::new(28, b"Config Built File\0".to_vec());

        assert_eq!(block.get(28), Some("Config Built File"));
        assert_eq!(block.get(35), Some("Built File"));
        assert_eq!(block.get(27), None);

        let offset = block.add("Type");
        assert_eq!(offset, 28 + 18);
        assert_eq!(block.add("Type"), offset);
        assert_eq!(block.offset_of("Config Built File"), Some(28));
    }
}
