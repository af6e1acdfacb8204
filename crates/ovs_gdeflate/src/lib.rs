//! # GDeflate Tile Streams
//!
//! Assets of Insomniac Games' PC ports are stored compressed as GDeflate tile streams. The output
//! is cut into 64 KiB tiles which are compressed independently; the stream records where each
//! compressed tile starts.
//!
//! ## Stream Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Id                     | 1 byte: always 4                                           |
//! | 0x0001         | Magic                  | 1 byte: complement of the id                               |
//! | 0x0002         | Tile count             | 2 bytes                                                    |
//! | 0x0004         | Packed sizes           | 4 bytes: tile size index, last tile size, reserved         |
//! | 0x0008         | Offsets                | 4 bytes per tile                                           |
//!
//! Slot 0 of the offset table is the compressed size of the last tile. Every other slot is where
//! its tile starts, counted from the end of the table; the first tile starts right there.
//!
//! ## Tile Decoding
//!
//! Tiles are handed to a [`TileDecoder`]. Every tile of a game archive is one GDeflate page: a
//! DEFLATE stream spread over 32 bit lanes, read by [`GDeflateTileDecoder`] (see [`page`] for the
//! lane layout). [`DeflateTileDecoder`] reads tiles that are a plain DEFLATE bitstream instead.
//!

pub mod decoder;
pub mod error;
pub mod page;
pub mod stream;

use tracing::{instrument, warn};

pub use decoder::{DeflateTileDecoder, GDeflateTileDecoder, TileDecoder};
pub use stream::{TileStream, TileStreamHeader, TILE_SIZE};

use crate::error::{Error, Result};

/// Decompress a GDeflate stream into exactly `output_size` bytes.
pub fn decompress(compressed: &[u8], output_size: usize) -> Result<Vec<u8>> {
    decompress_with(compressed, output_size, &mut GDeflateTileDecoder)
}

/// Decompress a stream into exactly `output_size` bytes.
///
/// Tile `i` lands at `i * 64 KiB`, the last tile is cut at `output_size`. Any tile failing to
/// decode aborts the whole stream.
#[instrument(skip(compressed, decoder), fields(len = compressed.len()))]
pub fn decompress_with(
    compressed: &[u8],
    output_size: usize,
    decoder: &mut impl TileDecoder,
) -> Result<Vec<u8>> {
    let stream = TileStream::parse(compressed)?;

    let mut output = vec![0u8; output_size];
    let mut scratch = vec![0u8; TILE_SIZE];
    for (index, tile) in stream.tiles().enumerate() {
        let start = index * TILE_SIZE;
        if start >= output_size {
            warn!(
                "stream has {} tiles, only {index} fit in {output_size} bytes",
                stream.len()
            );
            break;
        }

        decoder
            .decode_tile(tile?, &mut scratch)
            .map_err(|err| Error::TileDecode {
                index,
                reason: err.to_string(),
            })?;

        let end = (start + TILE_SIZE).min(output_size);
        output[start..end].copy_from_slice(&scratch[..end - start]);
    }

    Ok(output)
}
