use std::path::{Path, PathBuf};

use clap::Args;
use miette::Result;
use ovs_stg::Stg;
use tracing::debug;

use crate::commands::batch::{self, Batch};

#[derive(Args)]
pub struct UnwrapArgs {
    /// An input STG asset or a directory of them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target file, or directory when the input is one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write the install header and texture meta blocks next to the payload
    #[arg(long, default_value_t = false)]
    extras: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl UnwrapArgs {
    fn unwrap(&self, batch: &Batch, path: &Path) -> Result<()> {
        let stg = Stg::load(&batch::read(path)?, false)?;
        debug!(
            "{}: version {}, flags {:#X}, {} payload bytes",
            path.display(),
            stg.version(),
            stg.flags(),
            stg.raw().len()
        );

        let target = batch.target(path, batch::add_extension(path, "dat1"))?;
        batch::write(&target, stg.raw(), self.overwrite)?;

        if self.extras {
            if let Some(header) = stg.raw_header() {
                batch::write(
                    &batch::add_extension(&target, "header"),
                    header,
                    self.overwrite,
                )?;
            }
            if let Some(meta) = stg.texture_meta() {
                batch::write(
                    &batch::add_extension(&target, "meta"),
                    meta,
                    self.overwrite,
                )?;
            }
        }

        Ok(())
    }

    pub fn handle(&self) -> Result<()> {
        let batch = Batch::new(&self.file, self.output.as_deref());
        batch.run(|path| self.unwrap(&batch, path))
    }
}
