//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// stream header or offset table is malformed
    #[error("invalid tile stream: {0}")]
    InvalidTileStream(String),

    /// a single tile failed to decompress
    #[error("failed to decompress tile {index}: {reason}")]
    TileDecode { index: usize, reason: String },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
