use std::path::{Path, PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::commands::batch::{self, Batch};
use crate::commands::config::to_pretty_json;

#[derive(Args)]
pub struct ExportArgs {
    /// An input localization asset or a directory of them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target file, or directory when the input is one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExportArgs {
    fn export(&self, batch: &Batch, path: &Path) -> Result<()> {
        let (_, table) = super::load(path)?;
        info!("exporting {} entries of {}", table.len(), path.display());

        let json = serde_json::to_value(&table).into_diagnostic()?;
        let target = batch.target(path, batch::add_extension(path, "json"))?;
        batch::write(&target, &to_pretty_json(&json)?, self.overwrite)
    }

    pub fn handle(&self) -> Result<()> {
        let batch = Batch::new(&self.file, self.output.as_deref());
        batch.run(|path| self.export(&batch, path))
    }
}
