use std::path::{Path, PathBuf};

use clap::Args;
use miette::Result;
use ovs_stg::ConfigAsset;
use tracing::info;

use super::to_pretty_json;
use crate::commands::batch::{self, Batch};

#[derive(Args)]
pub struct ToJsonArgs {
    /// An input config, wrapped or bare, or a directory of them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target file, or directory when the input is one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ToJsonArgs {
    fn convert(&self, batch: &Batch, path: &Path) -> Result<()> {
        info!("converting {}", path.display());

        let asset = ConfigAsset::load(&batch::read(path)?, true)?;
        let json = asset.config().to_json()?;

        let target = batch.target(path, path.with_extension("json"))?;
        batch::write(&target, &to_pretty_json(&json)?, self.overwrite)
    }

    pub fn handle(&self) -> Result<()> {
        let batch = Batch::new(&self.file, self.output.as_deref());
        batch.run(|path| self.convert(&batch, path))
    }
}
