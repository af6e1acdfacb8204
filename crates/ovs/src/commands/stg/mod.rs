pub mod unwrap;

#[derive(clap::Subcommand)]
pub enum StgCommands {
    /// Strip the STG envelope off assets
    Unwrap(unwrap::UnwrapArgs),
}

impl StgCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            StgCommands::Unwrap(args) => args.handle(),
        }
    }
}
