//! Config assets.
//!
//! A config is a DAT1 with a structured "type" section, a structured "built" section holding the
//! actual content and an optional list of referenced assets.

use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::dat1::Dat1;
use crate::error::{Error, Result};
use crate::hash::{asset_id, crc32, fnv1};
use crate::sections::{ArraySection, Reference, SerializedSection};
use crate::tags::config::*;

/// First string of every saved config's string block
pub const BUILT_FILE_MARKER: &str = "Config Built File";

/// Extension hash used for references without an extension (localization keys, sounds)
pub const NO_EXTENSION_HASH: u32 = 0x3F08A054;

/// Build the reference record of an asset path stored at `path_offset`.
///
/// Paths with an extension are identified by their asset id and the CRC-32 of the extension,
/// including the dot. Paths without one get an FNV-1 based id in the `0xE` namespace.
pub fn reference_for(path: &str, path_offset: u32) -> Reference {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(dot) => Reference {
            asset_id: asset_id(path),
            path_offset,
            extension_hash: crc32(&file_name[dot..]),
        },
        None => Reference {
            asset_id: (0xE << 60) | u64::from(fnv1(path)),
            path_offset,
            extension_hash: NO_EXTENSION_HASH,
        },
    }
}

/// An editable config asset.
///
/// ```
/// use ovs_dat1::config::Config;
/// use serde_json::json;
///
/// let mut config = Config::new("SuitConfig");
/// *config.content_mut()? = json!({ "Name": "Classic" });
/// config.add_reference("characters/hero/classic.model");
///
/// let bytes = config.save()?;
/// let loaded = Config::parse(&bytes)?;
/// assert_eq!(loaded.type_name(), Some("SuitConfig"));
/// assert_eq!(loaded.content()?["Name"], "Classic");
/// assert_eq!(loaded.references(), ["characters\\hero\\classic.model"]);
/// # Ok::<(), ovs_dat1::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    dat1: Dat1,
    references: Option<Vec<String>>,
}

impl Config {
    /// A config container without any sections.
    pub fn empty() -> Self {
        Config {
            dat1: Dat1::new(MAGIC),
            references: None,
        }
    }

    /// A config of the given type with empty content and an empty reference list.
    pub fn new(type_name: &str) -> Self {
        let mut config = Config::empty();
        config
            .dat1
            .insert_section(TYPE, SerializedSection::new(json!({ "Type": type_name })));
        config
            .dat1
            .insert_section(BUILT, SerializedSection::default());
        config.references = Some(Vec::new());
        config
    }

    /// Parse a config container.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_dat1(Dat1::parse(data)?)
    }

    /// Interpret a parsed container as a config, resolving reference paths.
    pub fn from_dat1(dat1: Dat1) -> Result<Self> {
        if dat1.type_magic() != MAGIC {
            return Err(Error::WrongAssetType {
                expected: MAGIC,
                found: dat1.type_magic(),
            });
        }

        let references = match dat1.has_section(REFERENCES) {
            true => Some(
                dat1.section::<ArraySection<Reference>>(REFERENCES)?
                    .iter()
                    .map(|r| {
                        dat1.string_at(r.path_offset)
                            .map(str::to_owned)
                            .ok_or(Error::StringNotFound(r.path_offset))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            false => None,
        };

        Ok(Config { dat1, references })
    }

    /// Build a config from its JSON form `{ "TYPE": {..}, "DATA": {..}, "REFS": [..] }`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let field = |name: &str| {
            value
                .get(name)
                .filter(|v| v.is_object())
                .cloned()
                .ok_or_else(|| Error::Unrepresentable(format!("config JSON needs an object {name:?}")))
        };

        let mut config = Config::empty();
        config
            .dat1
            .insert_section(TYPE, SerializedSection::new(field("TYPE")?));
        config
            .dat1
            .insert_section(BUILT, SerializedSection::new(field("DATA")?));

        if let Some(refs) = value.get("REFS") {
            let refs = refs
                .as_array()
                .ok_or_else(|| Error::Unrepresentable("config JSON \"REFS\" must be a list".into()))?;
            config.references = Some(Vec::new());
            for path in refs {
                let path = path.as_str().ok_or_else(|| {
                    Error::Unrepresentable(format!("reference {path} is not a string"))
                })?;
                config.add_reference(path);
            }
        }

        Ok(config)
    }

    /// JSON form of the config, see [`Config::from_json`].
    pub fn to_json(&self) -> Result<Value> {
        let mut map = Map::new();
        map.insert("TYPE".into(), self.type_data()?.clone());
        map.insert("DATA".into(), self.content()?.clone());
        if let Some(references) = &self.references {
            map.insert("REFS".into(), json!(references));
        }
        Ok(Value::Object(map))
    }

    /// Type section data
    pub fn type_data(&self) -> Result<&Value> {
        Ok(&self.dat1.section::<SerializedSection>(TYPE)?.data)
    }

    pub fn type_data_mut(&mut self) -> Result<&mut Value> {
        Ok(&mut self.dat1.section_mut::<SerializedSection>(TYPE)?.data)
    }

    /// The `Type` field of the type section
    pub fn type_name(&self) -> Option<&str> {
        self.type_data().ok()?.get("Type")?.as_str()
    }

    /// Built section data
    pub fn content(&self) -> Result<&Value> {
        Ok(&self.dat1.section::<SerializedSection>(BUILT)?.data)
    }

    pub fn content_mut(&mut self) -> Result<&mut Value> {
        Ok(&mut self.dat1.section_mut::<SerializedSection>(BUILT)?.data)
    }

    /// Referenced asset paths
    pub fn references(&self) -> &[String] {
        self.references.as_deref().unwrap_or_default()
    }

    /// Whether the config has a reference section
    pub fn has_references(&self) -> bool {
        self.references.is_some()
    }

    /// Reference an asset, converting forward slashes to backslashes.
    pub fn add_reference(&mut self, path: &str) {
        self.references
            .get_or_insert_with(Vec::new)
            .push(path.replace('/', "\\"));
    }

    /// Replace the reference list, `None` drops the reference section.
    pub fn set_references(&mut self, references: Option<Vec<String>>) {
        self.references = references;
    }

    /// Underlying container
    pub fn dat1(&self) -> &Dat1 {
        &self.dat1
    }

    pub fn into_dat1(self) -> Dat1 {
        self.dat1
    }

    /// Serialize the config.
    ///
    /// The container string block is rebuilt from scratch, so every structured section is encoded
    /// again and the reference records are regenerated from their paths.
    #[instrument(skip_all, fields(references = self.references().len()))]
    pub fn save(&mut self) -> Result<Vec<u8>> {
        self.type_data_mut()?;
        self.content_mut()?;

        self.dat1.reset_strings();
        self.dat1.add_string(BUILT_FILE_MARKER);

        match &self.references {
            Some(paths) => {
                let mut references = Vec::with_capacity(paths.len());
                for path in paths {
                    let offset = self.dat1.add_string(path);
                    references.push(reference_for(path, offset));
                }
                self.dat1
                    .insert_section(REFERENCES, ArraySection::new(references));
            }
            None => {
                self.dat1.remove_section(REFERENCES);
            }
        }

        self.dat1.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::empty()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{reference_for, Config, BUILT_FILE_MARKER, NO_EXTENSION_HASH};
    use crate::dat1::Dat1;
    use crate::error::{Error, Result};
    use crate::hash::{asset_id, crc32, fnv1};
    use crate::sections::{ArraySection, Reference};
    use crate::tags::config::*;

    #[test]
    fn reference_with_extension() {
        let reference = reference_for("configs\\hero\\suit.config", 40);
        assert_eq!(reference.asset_id, asset_id("configs\\hero\\suit.config"));
        assert_eq!(reference.extension_hash, crc32(".config"));
        assert_eq!(reference.path_offset, 40);
    }

    #[test]
    fn reference_without_extension() {
        let reference = reference_for("SUIT_NAME_CLASSIC", 8);
        assert_eq!(reference.asset_id >> 60, 0xE);
        assert_eq!(reference.asset_id as u32, fnv1("SUIT_NAME_CLASSIC"));
        assert_eq!(reference.extension_hash, NO_EXTENSION_HASH);
    }

    #[test]
    fn dots_in_directories_are_not_extensions() {
        let reference = reference_for("v1.2\\localization_key", 0);
        assert_eq!(reference.extension_hash, NO_EXTENSION_HASH);
    }

    #[test]
    fn save_rebuilds_strings() -> Result<()> {
        let mut config = Config::new("SuitConfig");
        *config.content_mut()? = json!({ "Name": "Classic", "Index": 3 });
        config.add_reference("ui/icons/classic.texture");

        let bytes = config.save()?;
        let dat1 = Dat1::parse(&bytes)?;

        assert_eq!(
            dat1.tags().collect::<Vec<_>>(),
            vec![TYPE, BUILT, REFERENCES]
        );
        let base = dat1.strings().base();
        assert_eq!(dat1.string_at(base), Some(BUILT_FILE_MARKER));

        let references = dat1.section::<ArraySection<Reference>>(REFERENCES)?;
        assert_eq!(references.len(), 1);
        assert_eq!(
            dat1.string_at(references[0].path_offset),
            Some("ui\\icons\\classic.texture")
        );

        let loaded = Config::from_dat1(dat1)?;
        assert_eq!(loaded.content()?, &json!({ "Name": "Classic", "Index": 3 }));

        Ok(())
    }

    #[test]
    fn second_save_is_stable() -> Result<()> {
        let mut config = Config::new("SuitConfig");
        *config.content_mut()? = json!({ "List": [1, 2, 3], "Nested": { "Flag": true } });
        config.add_reference("a\\b.model");
        let first = config.save()?;

        let mut reloaded = Config::parse(&first)?;
        assert_eq!(reloaded.save()?, first);

        Ok(())
    }

    #[test]
    fn json_form() -> Result<()> {
        let json = json!({
            "TYPE": { "Type": "WeaponConfig" },
            "DATA": { "Damage": 12.5 },
            "REFS": ["weapons/gun.model"],
        });

        let mut config = Config::from_json(&json)?;
        let reloaded = Config::parse(&config.save()?)?;

        assert_eq!(
            reloaded.to_json()?,
            json!({
                "TYPE": { "Type": "WeaponConfig" },
                "DATA": { "Damage": 12.5 },
                "REFS": ["weapons\\gun.model"],
            })
        );

        Ok(())
    }

    #[test]
    fn rejects_other_assets() {
        let dat1 = Dat1::new(0x122BB0AB);
        assert!(matches!(
            Config::from_dat1(dat1),
            Err(Error::WrongAssetType {
                expected: MAGIC,
                ..
            })
        ));
    }
}
