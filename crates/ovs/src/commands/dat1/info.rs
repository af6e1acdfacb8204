use std::path::{Path, PathBuf};

use clap::Args;
use miette::{miette, Result};
use ovs_dat1::tags;
use ovs_stg::Stg;
use owo_colors::OwoColorize;

use crate::commands::batch::{self, Batch};

#[derive(Args)]
pub struct InfoArgs {
    /// An input asset, wrapped or bare, or a directory of them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Also list every container string
    #[arg(long, default_value_t = false)]
    strings: bool,
}

fn asset_kind(type_magic: u32) -> &'static str {
    match type_magic {
        tags::config::MAGIC => "config",
        tags::localization::MAGIC => "localization",
        tags::texture::MAGIC => "texture",
        _ => "unknown",
    }
}

impl InfoArgs {
    fn describe(&self, path: &Path) -> Result<()> {
        let stg = Stg::load(&batch::read(path)?, true)?;
        let dat1 = stg
            .dat1()
            .ok_or_else(|| miette!("{} is not a DAT1 asset", path.display()))?;

        println!("{}", path.display().bold());
        if stg.has_extras() {
            println!(
                "  STG flags {:#X}, header {} bytes, texture meta {} bytes",
                stg.flags(),
                stg.raw_header().map_or(0, <[u8]>::len),
                stg.texture_meta().map_or(0, <[u8]>::len)
            );
        }
        println!(
            "  type {:#010X} ({}), {} sections, {} bytes of strings",
            dat1.type_magic(),
            asset_kind(dat1.type_magic()).cyan(),
            dat1.len(),
            dat1.strings().as_bytes().len()
        );

        for info in dat1.section_info() {
            println!(
                "  {:#010X}  {:>8}  {:>8}  {:?}",
                info.tag.yellow(),
                info.original_offset.unwrap_or_default(),
                info.size,
                info.kind
            );
        }

        if self.strings {
            let block = dat1.strings();
            let mut offset = block.base();
            for value in block.as_bytes().split(|b| *b == 0) {
                if !value.is_empty() {
                    println!(
                        "  {:#06X}  {}",
                        offset,
                        String::from_utf8_lossy(value).dimmed()
                    );
                }
                offset += value.len() as u32 + 1;
            }
        }

        Ok(())
    }

    pub fn handle(&self) -> Result<()> {
        Batch::new(&self.file, None).run(|path| self.describe(path))
    }
}
