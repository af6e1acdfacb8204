pub mod diff;
pub mod export;
pub mod import;

use std::path::Path;

use miette::{miette, Result};
use ovs_dat1::Localization;
use ovs_stg::Stg;

use crate::commands::batch;

#[derive(clap::Subcommand)]
pub enum LocalizationCommands {
    /// Export localization tables to JSON
    Export(export::ExportArgs),
    /// Rebuild a localization table from JSON
    Import(import::ImportArgs),
    /// Compare two localization tables
    Diff(diff::DiffArgs),
}

impl LocalizationCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            LocalizationCommands::Export(args) => args.handle(),
            LocalizationCommands::Import(args) => args.handle(),
            LocalizationCommands::Diff(args) => args.handle(),
        }
    }
}

/// Read an asset and the localization table it holds.
pub(crate) fn load(path: &Path) -> Result<(Stg, Localization)> {
    let stg = Stg::load(&batch::read(path)?, true)?;
    let table = match stg.dat1() {
        Some(dat1) => Localization::load(dat1)?,
        None => return Err(miette!("{} is not a DAT1 asset", path.display())),
    };
    Ok((stg, table))
}
