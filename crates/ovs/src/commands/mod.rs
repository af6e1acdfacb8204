pub mod batch;
pub mod config;
pub mod dat1;
pub mod gdeflate;
pub mod localization;
pub mod stg;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect DAT1 containers
    Dat1 {
        #[command(subcommand)]
        command: dat1::Dat1Commands,
    },
    /// Convert config assets
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
    /// Edit localization tables
    Localization {
        #[command(subcommand)]
        command: localization::LocalizationCommands,
    },
    /// Handle STG envelopes
    Stg {
        #[command(subcommand)]
        command: stg::StgCommands,
    },
    /// Handle GDeflate tile streams
    Gdeflate {
        #[command(subcommand)]
        command: gdeflate::GdeflateCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Dat1 { command } => command.handle(),
            Commands::Config { command } => command.handle(),
            Commands::Localization { command } => command.handle(),
            Commands::Stg { command } => command.handle(),
            Commands::Gdeflate { command } => command.handle(),
        }
    }
}
