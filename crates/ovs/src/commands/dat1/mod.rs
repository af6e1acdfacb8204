pub mod info;

#[derive(clap::Subcommand)]
pub enum Dat1Commands {
    /// List the sections of DAT1 assets
    Info(info::InfoArgs),
}

impl Dat1Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Dat1Commands::Info(info) => info.handle(),
        }
    }
}
