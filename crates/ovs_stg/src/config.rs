//! Config assets wrapped in an STG.

use ovs_dat1::tags::config::MAGIC;
use ovs_dat1::Config;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::header::{AssetHeader, HeaderPair};
use crate::stg::{SaveOptions, Stg, StgFlag};

/// A config together with the envelope it is installed with.
///
/// The header of a config carries the size of the DAT1 in its first pair, which is kept up to date
/// on save.
#[derive(Debug, Clone)]
pub struct ConfigAsset {
    stg: Stg,
    config: Config,
}

impl ConfigAsset {
    /// A config of the given type with a fresh header.
    pub fn new(type_name: &str) -> Result<Self> {
        Self::from_config(Config::new(type_name))
    }

    /// Wrap a config with a fresh header.
    pub fn from_config(config: Config) -> Result<Self> {
        let mut stg = Stg::default();
        stg.set_header(Some(&Self::fresh_header(0)))?;
        stg.set_flag(StgFlag::InstallHeader, true);

        Ok(ConfigAsset { stg, config })
    }

    fn fresh_header(size: u32) -> AssetHeader {
        AssetHeader {
            pairs: vec![HeaderPair { a: size, b: 0 }],
            ..AssetHeader::new(MAGIC)
        }
    }

    /// Load a wrapped or bare config.
    pub fn load(data: &[u8], allow_raw: bool) -> Result<Self> {
        Self::from_stg(Stg::load(data, allow_raw)?)
    }

    /// Take the DAT1 view of an envelope as a config.
    pub fn from_stg(mut stg: Stg) -> Result<Self> {
        if let Some(header) = stg.header()? {
            if header.magic != MAGIC {
                return Err(Error::WrongAssetType {
                    expected: MAGIC,
                    found: header.magic,
                });
            }
        }

        let config = match stg.clear_dat1() {
            Some(dat1) => Config::from_dat1(dat1)?,
            None => Config::parse(stg.raw())?,
        };
        Ok(ConfigAsset { stg, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn stg(&self) -> &Stg {
        &self.stg
    }

    pub fn stg_mut(&mut self) -> &mut Stg {
        &mut self.stg
    }

    /// Reference an asset, see [`Config::add_reference`].
    pub fn add_reference(&mut self, path: &str) {
        self.config.add_reference(path);
    }

    /// Serialize the config and its envelope.
    #[instrument(skip(self))]
    pub fn save(&mut self, options: SaveOptions) -> Result<Vec<u8>> {
        let data = self.config.save()?;

        if let Some(mut header) = self.stg.header()? {
            match header.pairs.first_mut() {
                Some(pair) => pair.a = data.len() as u32,
                None => header.pairs.push(HeaderPair {
                    a: data.len() as u32,
                    b: 0,
                }),
            }
            self.stg.set_header(Some(&header))?;
        }

        self.stg.set_raw(data);
        self.stg.clear_dat1();
        self.stg.save(options)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::ConfigAsset;
    use crate::error::{Error, Result};
    use crate::header::AssetHeader;
    use crate::stg::{SaveOptions, Stg, StgFlag};

    #[traced_test]
    #[test]
    fn header_tracks_payload_size() -> Result<()> {
        let mut asset = Stg::config("VehicleConfig")?;
        *asset.config_mut().content_mut()? = json!({ "Speed": 40 });
        asset.add_reference("vehicles/car.model");

        let bytes = asset.save(SaveOptions::default())?;
        let stg = Stg::load(&bytes, false)?;

        assert!(stg.has_flag(StgFlag::InstallHeader));
        let header = stg.header()?.ok_or(Error::CustomError("missing header".into()))?;
        assert_eq!(header.magic, 0x35F7AFA5);
        assert_eq!(header.pairs[0].a as usize, stg.raw().len());

        let loaded = ConfigAsset::from_stg(stg)?;
        assert_eq!(loaded.config().type_name(), Some("VehicleConfig"));
        assert_eq!(loaded.config().content()?, &json!({ "Speed": 40 }));
        assert_eq!(loaded.config().references(), ["vehicles\\car.model"]);

        Ok(())
    }

    #[test]
    fn fresh_header() -> Result<()> {
        let asset = ConfigAsset::new("UiConfig")?;

        #[rustfmt::skip]
        let expected = [
            0xA5, 0xAF, 0xF7, 0x35, // magic
            0x00,
            0x01,                   // pairs
            0x00, 0x00,             // extra size
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(asset.stg().raw_header(), Some(&expected[..]));
        assert!(asset.stg().has_flag(StgFlag::InstallHeader));

        Ok(())
    }

    #[test]
    fn rejects_foreign_headers() -> Result<()> {
        let mut stg = Stg::from_raw(Vec::new());
        stg.set_header(Some(&AssetHeader::new(0x5C4580B9)))?;

        assert!(matches!(
            ConfigAsset::from_stg(stg),
            Err(Error::WrongAssetType {
                found: 0x5C4580B9,
                ..
            })
        ));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn bare_configs_stay_bare() -> Result<()> {
        let mut config = ovs_dat1::Config::new("UiConfig");
        let bytes = config.save()?;

        let mut asset = ConfigAsset::load(&bytes, true)?;
        assert!(!asset.stg().has_extras());
        assert_eq!(asset.save(SaveOptions::default())?, bytes);

        Ok(())
    }
}
