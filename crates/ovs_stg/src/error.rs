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

    /// Transparent wrapper for [`ovs_dat1::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Dat1Error(#[from] ovs_dat1::error::Error),

    /// stream does not start with the STG magic and raw payloads were not allowed
    #[error("stream is not wrapped in an STG envelope")]
    #[diagnostic(help("load with raw payloads allowed to accept bare assets"))]
    NotWrapped,

    /// STG version other than 0
    #[error("unsupported STG version {0}")]
    UnsupportedVersion(u8),

    /// stream ended before a block was complete
    #[error("stream truncated: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// asset header belongs to another kind of asset
    #[error("asset header is for type {found:#010X}, expected {expected:#010X}")]
    WrongAssetType { expected: u32, found: u32 },

    /// asset index has no such asset
    #[error("asset {asset_id:#018X} not found in span {span}")]
    AssetNotFound { span: u8, asset_id: u64 },

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
