pub mod decompress;

#[derive(clap::Subcommand)]
pub enum GdeflateCommands {
    /// Decompress a GDeflate tile stream
    Decompress(decompress::DecompressArgs),
}

impl GdeflateCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            GdeflateCommands::Decompress(args) => args.handle(),
        }
    }
}
