//! # STG Format Documentation
//!
//! This crate reads and writes the **STG** envelope used by mod tooling for Insomniac Games' PC
//! ports to store a single asset together with the blocks the game's table of contents keeps for
//! it. A stream without the STG magic is a bare asset.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic and version      | 4 bytes: `STG` in the low 24 bits, version in the top 8    |
//! | 0x0004         | Flags                  | 4 bytes: which blocks are installed with the asset         |
//! | 0x0008         | Header size            | 4 bytes                                                    |
//! | 0x000C         | Texture meta size      | 4 bytes                                                    |
//! | 0x0010         | Header                 | Header size bytes, padded to 16                            |
//! | ...            | Texture meta           | Texture meta size bytes, padded to 16                      |
//! | ...            | Payload                | Everything up to the end of the stream                     |
//!
//! The payload is usually a DAT1 container, see [`ovs_dat1`], and the header an [`AssetHeader`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stg`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Versions**: only version 0 exists
//!

pub mod config;
pub mod error;
pub mod header;
pub mod index;
pub mod stg;

pub use config::ConfigAsset;
pub use header::{AssetHeader, HeaderPair};
pub use index::{AssetIndex, AssetLocation};
pub use stg::{SaveOptions, Stg, StgFlag, STG_MAGIC};
