use std::path::PathBuf;

use clap::Args;
use miette::Result;
use ovs_gdeflate::{decompress_with, DeflateTileDecoder, GDeflateTileDecoder};
use tracing::info;

use crate::commands::batch;

#[derive(Args)]
pub struct DecompressArgs {
    /// A compressed tile stream
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Size of the decompressed data in bytes
    #[arg(short, long)]
    size: usize,

    /// A target file, defaults to the input with a `.bin` extension added
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Tiles are plain DEFLATE instead of GDeflate pages
    #[arg(long, default_value_t = false)]
    deflate: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let compressed = batch::read(&self.file)?;
        let data = match self.deflate {
            true => decompress_with(&compressed, self.size, &mut DeflateTileDecoder::new())?,
            false => decompress_with(&compressed, self.size, &mut GDeflateTileDecoder)?,
        };
        info!("{} bytes inflated to {}", compressed.len(), data.len());

        let target = match &self.output {
            Some(output) => output.clone(),
            None => batch::add_extension(&self.file, "bin"),
        };
        batch::write(&target, &data, self.overwrite)
    }
}
