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

    /// Transparent wrapper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// stream does not start with the DAT1 magic
    #[error("invalid DAT1 magic {0:#010X}")]
    #[diagnostic(help("the payload may still be compressed or wrapped"))]
    InvalidMagic(u32),

    /// container holds another kind of asset
    #[error("expected a DAT1 of type {expected:#010X}, found {found:#010X}")]
    WrongAssetType { expected: u32, found: u32 },

    /// stream ended before a structure was complete
    #[error("stream truncated: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// directory entry points outside of the container
    #[error("section {tag:#010X} spans {start}..{end} outside of a {len} byte container")]
    SectionOutOfBounds {
        tag: u32,
        start: usize,
        end: usize,
        len: usize,
    },

    /// the same tag appears twice in a directory
    #[error("section {0:#010X} appears more than once")]
    DuplicateSection(u32),

    /// unable to find requested section
    #[error("unable to find section {0:#010X}")]
    SectionNotFound(u32),

    /// section exists but decodes to another variant
    #[error("section {tag:#010X} is {found}, not {expected}")]
    TypeMismatch {
        tag: u32,
        expected: &'static str,
        found: &'static str,
    },

    /// section has no writer
    #[error("section {0:#010X} can not be saved")]
    #[diagnostic(help("this section type is read-only; remove it or leave it untouched"))]
    ReadOnlySection(u32),

    /// structured blob is malformed
    #[error("malformed structured data at offset {offset}: {reason}")]
    InvalidNode { offset: u64, reason: String },

    /// string offset has no string behind it
    #[error("no string at offset {0:#X}")]
    StringNotFound(u32),

    /// localization sections disagree with each other
    #[error("malformed localization table: {0}")]
    InvalidLocalization(String),

    /// value can not be represented by the on-disk format
    #[error("{0}")]
    Unrepresentable(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
