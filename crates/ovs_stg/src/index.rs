//! Archive index consumer interface.
//!
//! Reading the game's table of contents and its archives is left to the embedding tool; this crate
//! only needs to locate an asset and get its bytes.

use crate::error::Result;

/// Where an asset lives according to an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetLocation {
    /// Index of the archive file holding the asset
    pub archive: u32,
    pub span: u8,
    pub asset_id: u64,
}

/// A table of contents listing the assets of a game install.
pub trait AssetIndex {
    fn archive_count(&self) -> usize;

    /// File name of an archive, relative to the install directory
    fn archive_filename(&self, archive: usize) -> Option<&str>;

    fn asset_count(&self) -> usize;

    fn asset(&self, index: usize) -> Option<AssetLocation>;

    /// Decompressed payload of an asset.
    fn extract(&self, index: usize) -> Result<Vec<u8>>;

    /// Positions of every asset with the given id, one per span it is present in.
    fn indices_of(&self, asset_id: u64) -> Vec<usize>;

    /// Header block stored for an asset, for indices that carry them
    fn header(&self, _index: usize) -> Option<Vec<u8>> {
        None
    }

    /// Texture meta block stored for an asset, for indices that carry them
    fn texture_meta(&self, _index: usize) -> Option<Vec<u8>> {
        None
    }

    /// Position of an asset in a span.
    fn find(&self, span: u8, asset_id: u64) -> Option<usize> {
        self.indices_of(asset_id)
            .into_iter()
            .find(|i| self.asset(*i).is_some_and(|location| location.span == span))
    }
}
