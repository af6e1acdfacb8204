//! # DAT1 Format Documentation
//!
//! This crate reads, edits and writes the **DAT1** section container used by the PC ports of
//! Insomniac Games' titles. Every typed asset (configs, localization tables, textures, materials,
//! models, soundbanks) is a DAT1 holding a list of sections keyed by a 32-bit tag.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `1TAD`                                            |
//! | 0x0004         | Type magic             | 4 bytes: kind of asset stored in the container             |
//! | 0x0008         | Size                   | 4 bytes: size of the whole container                       |
//! | 0x000C         | Section count          | 4 bytes: number of directory entries                       |
//! | 0x0010         | Directory              | 12 bytes per section: tag, offset and size                 |
//!
//! ### String Block
//!
//! The bytes between the end of the directory and the first section hold NUL terminated strings
//! shared by every section. Sections point into it with absolute offsets, so the block moves and
//! those offsets change whenever the directory grows or shrinks.
//!
//! ### Sections
//!
//! Section payloads follow the string block, each starting on a 16 byte boundary. A section is
//! interpreted according to its tag through a [`sections::Registry`]; tags the registry does not
//! know are kept as raw bytes and written back unchanged.
//!
//! ## Assets
//!
//! - [`config::Config`]: typed structured data plus referenced asset paths
//! - [`localization::Localization`]: string tables keyed by localization keys
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Hashes**: tags and name hashes are CRC-32, asset ids are CRC-64 of normalized paths
//!

pub mod config;
pub mod dat1;
pub mod error;
pub mod hash;
pub mod localization;
pub mod sections;
pub mod strings;
pub mod tags;

pub use config::Config;
pub use dat1::{Dat1, SectionInfo, DAT1_MAGIC};
pub use localization::Localization;
pub use sections::serialized::Extraction;
