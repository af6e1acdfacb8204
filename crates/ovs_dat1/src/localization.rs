//! Localization tables.
//!
//! A localization DAT1 maps string keys to translated values through nine sections: the entry count,
//! key and value string tables, key and value offsets, one flags byte per entry, the CRC-32 of every
//! key and a copy of those hashes sorted together with their entry indices for binary search.
//!
//! [`Localization`] is the editable map. It is read from a container with [`Localization::load`] and
//! written back with [`Localization::rebuild`], which regenerates every section.

use indexmap::IndexMap;
use tracing::{instrument, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dat1::Dat1;
use crate::error::{Error, Result};
use crate::hash::crc32;
use crate::sections::{ArraySection, CountSection};
use crate::strings::StringTable;
use crate::tags::localization::*;

/// Key that always occupies the first entry of a table.
pub const SENTINEL_KEY: &str = "INVALID";

/// A translated value and its flags byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalizedString {
    pub value: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: u8,
}

/// An editable localization table.
///
/// ```
/// use ovs_dat1::{Dat1, localization::Localization};
///
/// let mut table = Localization::default();
/// table.insert("MENU_START", "Start", 0);
///
/// let mut dat1 = Localization::new_container();
/// table.rebuild(&mut dat1)?;
///
/// let loaded = Localization::load(&dat1)?;
/// assert_eq!(loaded.get("MENU_START"), Some("Start"));
/// assert_eq!(loaded.get("INVALID"), Some(""));
/// # Ok::<(), ovs_dat1::error::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Localization {
    entries: IndexMap<String, LocalizedString>,
}

impl Localization {
    /// An empty container of the localization kind.
    pub fn new_container() -> Dat1 {
        Dat1::new(MAGIC)
    }

    /// Read every entry of a localization container.
    #[instrument(skip_all)]
    pub fn load(dat1: &Dat1) -> Result<Self> {
        let count = dat1.section::<CountSection>(ENTRIES_COUNT)?.value as usize;
        let keys = dat1.section::<StringTable>(KEYS_DATA)?;
        let values = dat1.section::<StringTable>(VALUES_DATA)?;
        let key_offsets = dat1.section::<ArraySection<u32>>(KEYS_OFFSETS)?;
        let value_offsets = dat1.section::<ArraySection<u32>>(VALUES_OFFSETS)?;
        let flags = dat1.get::<ArraySection<u8>>(FLAGS);

        if key_offsets.len() < count || value_offsets.len() < count {
            return Err(Error::InvalidLocalization(format!(
                "{count} entries but {} key and {} value offsets",
                key_offsets.len(),
                value_offsets.len()
            )));
        }

        let mut entries = IndexMap::with_capacity(count);
        for i in 0..count {
            let key = keys
                .get(key_offsets[i])
                .ok_or(Error::StringNotFound(key_offsets[i]))?;
            let value = values
                .get(value_offsets[i])
                .ok_or(Error::StringNotFound(value_offsets[i]))?;
            let flags = flags.and_then(|f| f.get(i)).copied().unwrap_or_default();

            entries.insert(
                key.to_owned(),
                LocalizedString {
                    value: value.to_owned(),
                    flags,
                },
            );
        }

        Ok(Localization { entries })
    }

    /// Value of a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    /// Flags of a key
    pub fn flags(&self, key: &str) -> Option<u8> {
        self.entries.get(key).map(|e| e.flags)
    }

    /// Add a key or overwrite its value and flags.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, flags: u8) {
        self.entries.insert(
            key.into(),
            LocalizedString {
                value: value.into(),
                flags,
            },
        );
    }

    /// Remove a key. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Keys in load or insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocalizedString)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Regenerate all localization sections of `dat1` from this table.
    ///
    /// The sentinel entry comes first with an empty value, followed by every other key in ordinal
    /// byte order. The sorted hash index is ordered by hash, entries with equal hashes keep their
    /// index order.
    #[instrument(skip_all, fields(entries = self.entries.len()))]
    pub fn rebuild(&self, dat1: &mut Dat1) -> Result<()> {
        if dat1.type_magic() != MAGIC {
            warn!(
                "rebuilding localization inside a DAT1 of type {:#010X}",
                dat1.type_magic()
            );
        }

        let mut sorted: Vec<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .filter(|k| *k != SENTINEL_KEY)
            .collect();
        sorted.sort_unstable();

        let records = std::iter::once((SENTINEL_KEY, "", self.flags(SENTINEL_KEY).unwrap_or_default()))
            .chain(sorted.into_iter().map(|k| {
                let entry = &self.entries[k];
                (k, entry.value.as_str(), entry.flags)
            }));

        let mut keys = StringTable::default();
        let mut values = StringTable::default();
        let mut key_offsets = Vec::new();
        let mut value_offsets = Vec::new();
        let mut hashes = Vec::new();
        let mut flags = Vec::new();

        for (key, value, flag) in records {
            key_offsets.push(keys.add(key));
            value_offsets.push(values.add(value));
            hashes.push(crc32(key));
            flags.push(flag);
        }

        let count = hashes.len();
        if count > usize::from(u16::MAX) + 1 {
            return Err(Error::InvalidLocalization(format!(
                "{count} entries do not fit 16 bit sorted indices"
            )));
        }
        flags.resize(count * 4, 0);

        let mut sorted_hashes: Vec<(u32, u16)> = hashes
            .iter()
            .enumerate()
            .map(|(i, hash)| (*hash, i as u16))
            .collect();
        sorted_hashes.sort_by_key(|(hash, _)| *hash);
        let (sorted_hashes, sorted_indexes): (Vec<u32>, Vec<u16>) =
            sorted_hashes.into_iter().unzip();

        dat1.insert_section(ENTRIES_COUNT, CountSection::new(count as u32));
        dat1.insert_section(KEYS_DATA, keys);
        dat1.insert_section(KEYS_OFFSETS, ArraySection::new(key_offsets));
        dat1.insert_section(VALUES_DATA, values);
        dat1.insert_section(VALUES_OFFSETS, ArraySection::new(value_offsets));
        dat1.insert_section(FLAGS, ArraySection::new(flags));
        dat1.insert_section(KEY_HASHES, ArraySection::new(hashes));
        dat1.insert_section(SORTED_HASHES, ArraySection::new(sorted_hashes));
        dat1.insert_section(SORTED_INDEXES, ArraySection::new(sorted_indexes));

        Ok(())
    }
}

impl FromIterator<(String, LocalizedString)> for Localization {
    fn from_iter<I: IntoIterator<Item = (String, LocalizedString)>>(iter: I) -> Self {
        Localization {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Look a key up through the sorted hash index of a localization container.
///
/// Returns the value of the first entry whose hash and key both match.
pub fn lookup_by_hash<'a>(dat1: &'a Dat1, key: &str) -> Result<Option<&'a str>> {
    let sorted_hashes = dat1.section::<ArraySection<u32>>(SORTED_HASHES)?;
    let sorted_indexes = dat1.section::<ArraySection<u16>>(SORTED_INDEXES)?;
    let key_offsets = dat1.section::<ArraySection<u32>>(KEYS_OFFSETS)?;
    let value_offsets = dat1.section::<ArraySection<u32>>(VALUES_OFFSETS)?;
    let keys = dat1.section::<StringTable>(KEYS_DATA)?;
    let values = dat1.section::<StringTable>(VALUES_DATA)?;

    let hash = crc32(key);
    let first = sorted_hashes.partition_point(|h| *h < hash);

    for position in first..sorted_hashes.len() {
        if sorted_hashes[position] != hash {
            break;
        }
        let Some(index) = sorted_indexes.get(position).map(|i| usize::from(*i)) else {
            break;
        };

        let stored = key_offsets.get(index).and_then(|offset| keys.get(*offset));
        if stored == Some(key) {
            return Ok(value_offsets
                .get(index)
                .and_then(|offset| values.get(*offset)));
        }
    }

    Ok(None)
}
