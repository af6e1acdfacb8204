use std::path::PathBuf;

use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use ovs_dat1::Localization;
use ovs_stg::{SaveOptions, Stg};
use tracing::info;

use crate::commands::batch;

#[derive(Args)]
pub struct ImportArgs {
    /// A JSON file mapping keys to `{ "value": .., "flags": .. }`
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The asset to rebuild; its envelope and other sections are kept
    #[arg(short, long, value_name = "FILE")]
    base: Option<PathBuf>,

    /// A target file, defaults to the input without its `.json` extension
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let table: Localization =
            serde_json::from_slice(&batch::read(&self.file)?).into_diagnostic()?;
        info!("importing {} entries", table.len());

        let mut stg = match &self.base {
            Some(base) => super::load(base)?.0,
            None => {
                let mut stg = Stg::default();
                stg.set_dat1(Some(Localization::new_container()));
                stg
            }
        };

        let dat1 = stg
            .dat1_mut()
            .ok_or_else(|| miette!("the base asset is not a DAT1"))?;
        table.rebuild(dat1)?;
        let data = stg.save(SaveOptions::default())?;

        let target = match &self.output {
            Some(output) => output.clone(),
            None => self.file.with_extension(""),
        };
        batch::write(&target, &data, self.overwrite)
    }
}
