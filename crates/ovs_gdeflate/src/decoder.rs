//! Per-tile decompression.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};
use crate::page::decode_page;

/// Decompresses one tile into a scratch buffer.
///
/// Implementations return the number of bytes written to `output`; errors are reported by
/// [`decompress_with`](crate::decompress_with) together with the tile index.
pub trait TileDecoder {
    fn decode_tile(&mut self, tile: &[u8], output: &mut [u8]) -> Result<usize>;
}

/// Decoder for lane interleaved GDeflate pages, see [`crate::page`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GDeflateTileDecoder;

impl TileDecoder for GDeflateTileDecoder {
    fn decode_tile(&mut self, tile: &[u8], output: &mut [u8]) -> Result<usize> {
        decode_page(tile, output)
    }
}

/// Decoder for tiles holding a single raw DEFLATE bitstream.
///
/// Not used by game archives; handy for streams framed around zlib output.
pub struct DeflateTileDecoder {
    inner: Decompress,
}

impl DeflateTileDecoder {
    pub fn new() -> Self {
        DeflateTileDecoder {
            inner: Decompress::new(false),
        }
    }
}

impl Default for DeflateTileDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TileDecoder for DeflateTileDecoder {
    fn decode_tile(&mut self, tile: &[u8], output: &mut [u8]) -> Result<usize> {
        self.inner.reset(false);

        let status = self
            .inner
            .decompress(tile, output, FlushDecompress::Finish)
            .map_err(|err| Error::InvalidTileStream(err.to_string()))?;

        match status {
            Status::StreamEnd => Ok(self.inner.total_out() as usize),
            Status::Ok | Status::BufError => Err(Error::InvalidTileStream(format!(
                "tile does not end within {} bytes of output",
                output.len()
            ))),
        }
    }
}
