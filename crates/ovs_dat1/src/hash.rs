//! Hash functions used for keys, property names and asset ids.

use crc::{Crc, CRC_32_ISO_HDLC, CRC_64_XZ};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// CRC-32 of a string's UTF-8 bytes.
pub fn crc32(value: &str) -> u32 {
    CRC32.checksum(value.as_bytes())
}

/// CRC-64 of a string's UTF-8 bytes.
pub fn crc64(value: &str) -> u64 {
    CRC64.checksum(value.as_bytes())
}

/// Lowercase FNV-1 over the low byte of each character.
pub fn fnv1(value: &str) -> u32 {
    value.to_lowercase().chars().fold(2166136261u32, |acc, c| {
        acc.wrapping_mul(16777619) ^ (c as u32 & 0xFF)
    })
}

/// Lowercase, forward slashes, no repeated separators.
pub fn normalize_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut slash = false;
    for c in path.to_lowercase().chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if slash {
                continue;
            }
            slash = true;
        } else {
            slash = false;
        }
        result.push(c);
    }
    result
}

/// Asset id of a path: CRC-64 of its normalized form.
pub fn asset_id(path: &str) -> u64 {
    crc64(&normalize_path(path))
}
