use std::path::{Path, PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Result};
use ovs_dat1::Config;
use ovs_stg::{ConfigAsset, SaveOptions};
use tracing::info;

use crate::commands::batch::{self, Batch};

#[derive(Args)]
pub struct FromJsonArgs {
    /// An input JSON file with `TYPE`, `DATA` and optionally `REFS`, or a directory of them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target file, or directory when the input is one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Write the bare DAT1 instead of an STG with an asset header
    #[arg(long, default_value_t = false)]
    bare: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl FromJsonArgs {
    fn convert(&self, batch: &Batch, path: &Path) -> Result<()> {
        info!("building {}", path.display());

        let json: serde_json::Value =
            serde_json::from_slice(&batch::read(path)?).into_diagnostic()?;
        let mut config = Config::from_json(&json)?;

        let data = match self.bare {
            true => config.save()?,
            false => ConfigAsset::from_config(config)?.save(SaveOptions::default())?,
        };

        let target = batch.target(path, path.with_extension("config"))?;
        batch::write(&target, &data, self.overwrite)
    }

    pub fn handle(&self) -> Result<()> {
        let batch = Batch::new(&self.file, self.output.as_deref());
        batch.run(|path| self.convert(&batch, path))
    }
}
