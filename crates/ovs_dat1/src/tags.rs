//! Known section tags and asset type magics.
//!
//! Tags are CRC-32 hashes of the section names used by the engine; the names are given next to each
//! constant where they are known.

/// Config assets
pub mod config {
    /// Type magic of a config DAT1
    pub const MAGIC: u32 = 0x35F7AFA5;
    /// "Config Type"
    pub const TYPE: u32 = 0x4A128222;
    /// "Config Built"
    pub const BUILT: u32 = 0xE501186F;
    /// "Config Asset Refs"
    pub const REFERENCES: u32 = 0x58B8558A;
}

/// Localization tables
pub mod localization {
    /// Type magic of a localization DAT1
    pub const MAGIC: u32 = 0x122BB0AB;
    pub const ENTRIES_COUNT: u32 = 0xD540A903;
    pub const KEYS_DATA: u32 = 0x4D73CEBD;
    /// "Localization TagOffsets Built"
    pub const KEYS_OFFSETS: u32 = 0xA4EA55B2;
    pub const VALUES_DATA: u32 = 0x70A382B8;
    pub const VALUES_OFFSETS: u32 = 0xF80DEEB4;
    /// "Localization Flags Built"
    pub const FLAGS: u32 = 0xB0653243;
    pub const KEY_HASHES: u32 = 0x06A58050;
    /// "Localization SortedHashes Built"
    pub const SORTED_HASHES: u32 = 0xC43731B5;
    /// "Localization SortedIndexes Built"
    pub const SORTED_INDEXES: u32 = 0x0CD2CFE9;
}

/// Textures
pub mod texture {
    /// Type magic of a texture DAT1
    pub const MAGIC: u32 = 0x5C4580B9;
    pub const HEADER: u32 = 0x4EDE3593;
}

/// Materials
pub mod material {
    /// "Material Serialized Data"
    pub const SERIALIZED_DATA: u32 = 0xF5260180;
}

/// Models
pub mod model {
    /// "Model Material"
    pub const MATERIAL: u32 = 0x3250BB80;
}

/// Sound banks
pub mod soundbank {
    /// "Sound Bank Info"
    pub const INFO: u32 = 0x0E19E37F;
    /// "Sound Bank Strings"
    pub const STRINGS: u32 = 0x3E8490A3;
    /// "Sound Bank Stream Lookup"
    pub const STREAM_LOOKUP: u32 = 0x024A788B;
}

/// Wwise lookup tables
pub mod wwise {
    pub const ASSETS: u32 = 0x52B343E8;
    pub const EVENTS: u32 = 0x739B21E0;
}

/// Actors
pub mod actor {
    /// "Actor Object Built"
    pub const OBJECT_BUILT: u32 = 0x364A6C7C;
    /// "Actor Prius Built"
    pub const PRIUS_BUILT: u32 = 0x135832C8;
    /// "Actor Prius Built Data"
    pub const PRIUS_BUILT_DATA: u32 = 0x6D4301EF;
}

/// Levels
pub mod level {
    /// "Level Built"
    pub const BUILT: u32 = 0x7CA7267D;
    pub const EMBEDDED_ZONES: u32 = 0x5818CB19;
    pub const LINK_DATA: u32 = 0x3395AEC1;
    pub const RANDOM_LIST: u32 = 0xC30D92B6;
    /// "Level Regions Built"
    pub const REGIONS_BUILT: u32 = 0x396F9418;
    pub const ZONE_INDEXES: u32 = 0x95F91E24;
    pub const NAMED_BLOCKS: u32 = 0x41887FB3;
    pub const GROUPS: u32 = 0xFD39FA81;
    pub const ZONE_INDEX_GROUPS: u32 = 0xFC984113;
    /// "Level Zones Built"
    pub const ZONES_BUILT: u32 = 0x4E023760;
}

/// Zones
pub mod zone {
    /// "Zone Hibernate Objects"
    pub const HIBERNATE_OBJECTS: u32 = 0x296E6DC7;
}
