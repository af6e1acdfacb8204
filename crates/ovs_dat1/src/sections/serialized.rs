//! Structured key/value blobs.
//!
//! A blob is a tree of typed nodes rooted at an object. Objects start with a 16 byte header
//! `0u32, 0x03150044u32, child_count: u32, data_length: u32`, followed by one 8 byte header per child
//! `(crc32(name): u32, flags: u16, 0u8, node_type: u8)`, one `u32` name offset per child (pointing into
//! the container string block), padding to 4 and the children themselves. `flags` is
//! `item_count << 4 | 1` for arrays and `1 << 4` otherwise.
//!
//! The tree is exposed as a [`serde_json::Value`]. When writing, integer nodes get the narrowest type
//! able to hold them, so a blob that is read and written again is equal in content but not always in
//! bytes.

use std::io::Cursor;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use serde_json::{Map, Value};
use tracing::instrument;

use super::{ReadContext, SectionCodec, WriteContext};
use crate::error::{Error, Result};
use crate::hash::{crc32, crc64};
use crate::strings::{align, StringBlock};

const OBJECT_MARKER: u32 = 0x03150044;

/// Type of a node, as stored in the child header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    U8 = 0x00,
    U16 = 0x01,
    U32 = 0x02,
    I8 = 0x04,
    I16 = 0x05,
    I32 = 0x06,
    F32 = 0x08,
    String = 0x0A,
    Object = 0x0D,
    Bool = 0x0F,
    InstanceId = 0x11,
    Null = 0x13,
}

impl TryFrom<u8> for NodeType {
    type Error = u8;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        Ok(match value {
            0x00 => NodeType::U8,
            0x01 => NodeType::U16,
            0x02 => NodeType::U32,
            0x04 => NodeType::I8,
            0x05 => NodeType::I16,
            0x06 => NodeType::I32,
            0x08 => NodeType::F32,
            0x0A => NodeType::String,
            0x0D => NodeType::Object,
            0x0F => NodeType::Bool,
            0x11 => NodeType::InstanceId,
            0x13 => NodeType::Null,
            other => return Err(other),
        })
    }
}

/// A section holding one structured blob.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedSection {
    pub data: Value,
}

impl Default for SerializedSection {
    fn default() -> Self {
        SerializedSection {
            data: Value::Object(Map::new()),
        }
    }
}

impl SerializedSection {
    pub fn new(data: Value) -> Self {
        SerializedSection { data }
    }
}

impl SectionCodec for SerializedSection {
    const NAME: &'static str = "structured data";

    fn read(data: &[u8], ctx: &ReadContext<'_>) -> Result<Self> {
        Ok(SerializedSection {
            data: decode(data, ctx.strings)?,
        })
    }

    fn write(&self, ctx: &mut WriteContext<'_>) -> Result<Vec<u8>> {
        encode(&self.data, ctx.strings)
    }
}

/// Decode a blob, resolving property names through `strings`.
#[instrument(skip_all, fields(len = data.len()))]
pub fn decode(data: &[u8], strings: &StringBlock) -> Result<Value> {
    let mut reader = Reader {
        cursor: Cursor::new(data),
        strings,
        name_fields: Vec::new(),
    };
    reader.object()
}

/// Move every property name offset of a blob by `shift` bytes.
///
/// `strings` is the block the blob currently resolves its names through. The blob is left
/// untouched when it does not decode.
pub fn rebase_names(data: &mut [u8], strings: &StringBlock, shift: i64) -> Result<()> {
    let mut reader = Reader {
        cursor: Cursor::new(&*data),
        strings,
        name_fields: Vec::new(),
    };
    reader.object()?;

    for field in reader.name_fields {
        let field = field as usize;
        let offset = LittleEndian::read_u32(&data[field..field + 4]);
        LittleEndian::write_u32(
            &mut data[field..field + 4],
            (i64::from(offset) + shift) as u32,
        );
    }
    Ok(())
}

/// Encode a blob, interning property names into `strings`.
///
/// The root has to be an object.
#[instrument(skip_all)]
pub fn encode(value: &Value, strings: &mut StringBlock) -> Result<Vec<u8>> {
    let Value::Object(map) = value else {
        return Err(Error::Unrepresentable(format!(
            "structured data must be an object, found {value}"
        )));
    };

    let mut writer = Writer {
        out: Vec::new(),
        strings,
    };
    writer.object(map)?;
    Ok(writer.out)
}

/// Outcome of decoding a blob embedded in another section.
#[derive(Debug)]
pub enum Extraction {
    /// The blob decoded cleanly
    Data(Value),
    /// Nothing is stored for this entry
    Absent,
    /// Something is stored but it could not be decoded
    Invalid(Error),
}

impl Extraction {
    /// The decoded value, if any.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Extraction::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Extraction::Invalid(_))
    }
}

struct Reader<'a, 'b> {
    cursor: Cursor<&'a [u8]>,
    strings: &'b StringBlock,
    /// Positions of the property name offsets read so far
    name_fields: Vec<u64>,
}

macro_rules! read_le {
    ($($name:ident: $ty:ty => $method:ident),+ $(,)?) => {
        $(
            fn $name(&mut self) -> Result<$ty> {
                let offset = self.position() as usize;
                self.cursor
                    .$method::<LittleEndian>()
                    .map_err(|_| Error::Truncated {
                        offset,
                        needed: std::mem::size_of::<$ty>(),
                    })
            }
        )+
    };
}

impl Reader<'_, '_> {
    read_le! {
        u16: u16 => read_u16,
        u32: u32 => read_u32,
        u64: u64 => read_u64,
        i16: i16 => read_i16,
        i32: i32 => read_i32,
        f32: f32 => read_f32,
    }

    fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    fn u8(&mut self) -> Result<u8> {
        let offset = self.position() as usize;
        self.cursor.read_u8().map_err(|_| Error::Truncated { offset, needed: 1 })
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        let target = self.position() + count;
        if target > self.len() {
            return Err(Error::Truncated {
                offset: self.position() as usize,
                needed: count as usize,
            });
        }
        self.cursor.set_position(target);
        Ok(())
    }

    fn align(&mut self, alignment: u64) -> Result<()> {
        let padding = (alignment - self.position() % alignment) % alignment;
        self.skip(padding)
    }

    fn object(&mut self) -> Result<Value> {
        let strings = self.strings;
        let header = self.position();
        self.u32()?;
        let marker = self.u32()?;
        if marker != OBJECT_MARKER {
            return Err(Error::InvalidNode {
                offset: header + 4,
                reason: format!("expected object marker, found {marker:#010X}"),
            });
        }
        let count = self.u32()? as u64;
        let data_length = u64::from(self.u32()?);

        let start = self.position();
        if start + data_length > self.len() || count * 12 > self.len() - start {
            return Err(Error::Truncated {
                offset: start as usize,
                needed: data_length.max(count * 12) as usize,
            });
        }

        let mut map = Map::new();
        if count > 0 {
            let mut children = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let _hash = self.u32()?;
                let flags = self.u16()?;
                self.u8()?;
                let kind = self.u8()?;
                children.push((flags, kind));
            }

            let mut names = Vec::with_capacity(count as usize);
            for _ in 0..count {
                self.name_fields.push(self.position());
                names.push(self.u32()?);
            }
            self.align(4)?;

            for ((flags, kind), name_offset) in children.into_iter().zip(names) {
                let name = strings
                    .get(name_offset)
                    .ok_or(Error::StringNotFound(name_offset))?;
                let kind = NodeType::try_from(kind).map_err(|kind| Error::InvalidNode {
                    offset: self.position(),
                    reason: format!("unknown node type {kind:#04X} for {name:?}"),
                })?;

                let value = if flags & 1 == 1 {
                    self.array(kind, flags >> 4)?
                } else {
                    self.node(kind)?
                };
                map.insert(name.to_owned(), value);
            }
        }

        let consumed = self.position() - start;
        if consumed > data_length {
            return Err(Error::InvalidNode {
                offset: header,
                reason: format!("children use {consumed} bytes of a {data_length} byte object"),
            });
        }
        self.skip(data_length - consumed)?;

        Ok(Value::Object(map))
    }

    fn array(&mut self, kind: NodeType, count: u16) -> Result<Value> {
        if count == 0 {
            self.u8()?;
            return Ok(Value::Array(Vec::new()));
        }

        (0..count)
            .map(|_| self.node(kind))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn node(&mut self, kind: NodeType) -> Result<Value> {
        Ok(match kind {
            NodeType::U8 => self.u8()?.into(),
            NodeType::U16 => self.u16()?.into(),
            NodeType::U32 => self.u32()?.into(),
            NodeType::I8 => (self.u8()? as i8).into(),
            NodeType::I16 => self.i16()?.into(),
            NodeType::I32 => self.i32()?.into(),
            NodeType::F32 => self.f32()?.into(),
            NodeType::String => self.string()?.into(),
            NodeType::Object => self.object()?,
            NodeType::Bool => Value::Bool(self.u8()? != 0),
            NodeType::InstanceId => self.u64()?.into(),
            NodeType::Null => {
                self.u8()?;
                Value::Null
            }
        })
    }

    fn string(&mut self) -> Result<String> {
        let length = self.u32()? as usize;
        let _crc32 = self.u32()?;
        let _crc64 = self.u64()?;

        let start = self.position() as usize;
        let padded = align(length + 1, 4);
        self.skip(padded as u64)?;

        let bytes = &self.cursor.get_ref()[start..start + length];
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

struct Writer<'a> {
    out: Vec<u8>,
    strings: &'a mut StringBlock,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    fn pad(&mut self, alignment: usize) {
        let len = align(self.out.len(), alignment);
        self.out.resize(len, 0);
    }

    fn object(&mut self, map: &Map<String, Value>) -> Result<()> {
        let header = self.out.len();
        self.put(&0u32.to_le_bytes());
        self.put(&OBJECT_MARKER.to_le_bytes());
        self.put(&(map.len() as u32).to_le_bytes());
        self.put(&0u32.to_le_bytes());
        let start = self.out.len();

        let mut kinds = Vec::with_capacity(map.len());
        for (name, value) in map {
            let kind = node_type(value)?;
            let flags = match value {
                Value::Array(items) if items.len() > 0x0FFF => {
                    return Err(Error::Unrepresentable(format!(
                        "{name:?} has {} items, at most 4095 fit",
                        items.len()
                    )))
                }
                Value::Array(items) => ((items.len() as u16) << 4) | 1,
                _ => 1 << 4,
            };

            self.put(&crc32(name).to_le_bytes());
            self.put(&flags.to_le_bytes());
            self.put(&[0, kind as u8]);
            kinds.push(kind);
        }

        for name in map.keys() {
            let offset = self.strings.add(name);
            self.put(&offset.to_le_bytes());
        }

        if !map.is_empty() {
            self.pad(4);
        }

        for (value, kind) in map.values().zip(kinds) {
            match value {
                Value::Array(items) => self.array(kind, items)?,
                _ => self.node(kind, value)?,
            }
        }
        self.pad(4);

        let length = (self.out.len() - start) as u32;
        self.out[header + 12..header + 16].copy_from_slice(&length.to_le_bytes());
        Ok(())
    }

    fn array(&mut self, kind: NodeType, items: &[Value]) -> Result<()> {
        if items.is_empty() {
            self.put(&[0]);
            return Ok(());
        }

        for item in items {
            self.node(kind, item)?;
        }
        Ok(())
    }

    fn node(&mut self, kind: NodeType, value: &Value) -> Result<()> {
        match kind {
            NodeType::U8 => self.put(&[unsigned::<u8>(value)?]),
            NodeType::U16 => self.put(&unsigned::<u16>(value)?.to_le_bytes()),
            NodeType::U32 => self.put(&unsigned::<u32>(value)?.to_le_bytes()),
            NodeType::I8 => self.put(&signed::<i8>(value)?.to_le_bytes()),
            NodeType::I16 => self.put(&signed::<i16>(value)?.to_le_bytes()),
            NodeType::I32 => self.put(&signed::<i32>(value)?.to_le_bytes()),
            NodeType::F32 => {
                let float = value.as_f64().ok_or_else(|| mismatch(kind, value))?;
                self.put(&(float as f32).to_le_bytes())
            }
            NodeType::String => {
                let string = value.as_str().ok_or_else(|| mismatch(kind, value))?;
                self.string(string)
            }
            NodeType::Object => {
                let map = value.as_object().ok_or_else(|| mismatch(kind, value))?;
                self.object(map)?
            }
            NodeType::Bool => {
                let flag = value.as_bool().ok_or_else(|| mismatch(kind, value))?;
                self.put(&[u8::from(flag)])
            }
            NodeType::InstanceId => {
                let id = value
                    .as_u64()
                    .or_else(|| value.as_i64().map(|v| v as u64))
                    .ok_or_else(|| mismatch(kind, value))?;
                self.put(&id.to_le_bytes())
            }
            NodeType::Null => self.put(&[0]),
        }
        Ok(())
    }

    fn string(&mut self, value: &str) {
        let (crc32, crc64) = match value {
            "" => (0, 0),
            value => (crc32(value), crc64(value)),
        };

        self.put(&(value.len() as u32).to_le_bytes());
        self.put(&crc32.to_le_bytes());
        self.put(&crc64.to_le_bytes());
        self.put(value.as_bytes());

        let padded = align(value.len() + 1, 4);
        let len = self.out.len() + padded - value.len();
        self.out.resize(len, 0);
    }
}

fn mismatch(kind: NodeType, value: &Value) -> Error {
    Error::Unrepresentable(format!("{value} can not be stored as {kind:?}"))
}

fn unsigned<T: TryFrom<u64>>(value: &Value) -> Result<T> {
    value
        .as_u64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| Error::Unrepresentable(format!("{value} does not fit an unsigned node")))
}

fn signed<T: TryFrom<i64>>(value: &Value) -> Result<T> {
    value
        .as_i64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| Error::Unrepresentable(format!("{value} does not fit a signed node")))
}

/// Node type a value is stored as.
pub fn node_type(value: &Value) -> Result<NodeType> {
    Ok(match value {
        Value::Null => NodeType::Null,
        Value::Bool(_) => NodeType::Bool,
        Value::Number(n) if n.is_f64() => NodeType::F32,
        Value::Number(n) => match n.as_u64() {
            Some(v) => integer_type(0, i128::from(v)),
            None => {
                let v = i128::from(n.as_i64().unwrap_or_default());
                integer_type(v, v)
            }
        },
        Value::String(_) => NodeType::String,
        Value::Object(_) => NodeType::Object,
        Value::Array(items) => element_type(items)?,
    })
}

fn element_type(items: &[Value]) -> Result<NodeType> {
    let Some(first) = items.first() else {
        return Ok(NodeType::Null);
    };
    if !first.is_number() {
        return node_type(first);
    }

    let mut range: Option<(i128, i128)> = None;
    for item in items {
        let Value::Number(n) = item else {
            return Err(mismatch(NodeType::F32, item));
        };
        let v = match (n.as_u64(), n.as_i64()) {
            (Some(v), _) => i128::from(v),
            (None, Some(v)) => i128::from(v),
            (None, None) => return Ok(NodeType::F32),
        };
        range = Some(match range {
            Some((min, max)) => (min.min(v), max.max(v)),
            None => (v, v),
        });
    }

    let (min, max) = range.unwrap_or_default();
    Ok(integer_type(min, max))
}

fn integer_type(min: i128, max: i128) -> NodeType {
    let fits = |lo: i128, hi: i128| min >= lo && max <= hi;

    if min >= 0 {
        if max <= i128::from(u8::MAX) {
            NodeType::U8
        } else if max <= i128::from(u16::MAX) {
            NodeType::U16
        } else if max <= i128::from(u32::MAX) {
            NodeType::U32
        } else {
            NodeType::InstanceId
        }
    } else if fits(i128::from(i8::MIN), i128::from(i8::MAX)) {
        NodeType::I8
    } else if fits(i128::from(i16::MIN), i128::from(i16::MAX)) {
        NodeType::I16
    } else if fits(i128::from(i32::MIN), i128::from(i32::MAX)) {
        NodeType::I32
    } else {
        NodeType::InstanceId
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{decode, encode, node_type, rebase_names, NodeType};
    use crate::error::{Error, Result};
    use crate::strings::StringBlock;

    #[test]
    fn integer_types_are_narrowest() -> Result<()> {
        assert_eq!(node_type(&json!(200))?, NodeType::U8);
        assert_eq!(node_type(&json!(256))?, NodeType::U16);
        assert_eq!(node_type(&json!(70000))?, NodeType::U32);
        assert_eq!(node_type(&json!(0x1_0000_0000u64))?, NodeType::InstanceId);
        assert_eq!(node_type(&json!(-1))?, NodeType::I8);
        assert_eq!(node_type(&json!(-129))?, NodeType::I16);
        assert_eq!(node_type(&json!(-40000))?, NodeType::I32);
        assert_eq!(node_type(&json!(1.5))?, NodeType::F32);

        assert_eq!(node_type(&json!([1, 2, 300]))?, NodeType::U16);
        assert_eq!(node_type(&json!([1, -2, 100]))?, NodeType::I8);
        assert_eq!(node_type(&json!([1, -2, 200]))?, NodeType::I16);
        assert_eq!(node_type(&json!([1, 2.5]))?, NodeType::F32);
        assert_eq!(node_type(&json!([]))?, NodeType::Null);
        assert_eq!(node_type(&json!(["a"]))?, NodeType::String);

        Ok(())
    }

    #[test]
    fn empty_object() -> Result<()> {
        let mut strings = StringBlock::default();
        let bytes = encode(&json!({}), &mut strings)?;

        #[rustfmt::skip]
        assert_eq!(bytes, vec![
            0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x15, 0x03,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);
        assert!(strings.is_empty());

        Ok(())
    }

    #[test]
    fn single_u8_child() -> Result<()> {
        let mut strings = StringBlock::new(28, Vec::new());
        let bytes = encode(&json!({ "a": 7 }), &mut strings)?;

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x15, 0x03,
            0x01, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00, // data length
            0x43, 0xBE, 0xB7, 0xE8, // crc32("a")
            0x10, 0x00,             // flags
            0x00,
            0x00,                   // u8
            0x1C, 0x00, 0x00, 0x00, // name offset
            0x07, 0x00, 0x00, 0x00, // value + padding
        ];
        assert_eq!(bytes, expected);
        assert_eq!(strings.get(28), Some("a"));

        Ok(())
    }

    #[test]
    fn names_follow_the_string_block() -> Result<()> {
        let value = json!({ "a": 7, "inner": { "b": true } });
        let mut strings = StringBlock::new(28, Vec::new());
        let mut bytes = encode(&value, &mut strings)?;

        let mut moved = strings.clone();
        moved.set_base(40);
        rebase_names(&mut bytes, &strings, 12)?;

        assert_eq!(bytes[32..36], 40u32.to_le_bytes());
        assert_eq!(decode(&bytes, &moved)?, value);
        assert!(rebase_names(&mut bytes, &strings, 12).is_err());

        Ok(())
    }

    #[test]
    fn tree_roundtrip() -> Result<()> {
        let value = json!({
            "Name": "hero",
            "Empty": "",
            "Health": 1500,
            "Offset": -3,
            "Scale": 0.5,
            "Enabled": true,
            "Id": 0x1122334455667788u64,
            "Nothing": null,
            "Tags": ["a", "bb", "ccc"],
            "Weights": [1, 2, 70000],
            "None": [],
            "Nested": { "Inner": { "Deep": [false, true] }, "Other": {} },
        });

        let mut strings = StringBlock::new(16, Vec::new());
        let bytes = encode(&value, &mut strings)?;
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(decode(&bytes, &strings)?, value);

        Ok(())
    }

    #[test]
    fn strings_keep_hashes_and_padding() -> Result<()> {
        let mut strings = StringBlock::default();
        let bytes = encode(&json!({ "s": "abc" }), &mut strings)?;

        // header, one child header, one name offset, string node
        let node = &bytes[16 + 8 + 4..];
        assert_eq!(node[..4], 3u32.to_le_bytes());
        assert_eq!(node[4..8], crate::hash::crc32("abc").to_le_bytes());
        assert_eq!(node[8..16], crate::hash::crc64("abc").to_le_bytes());
        assert_eq!(&node[16..20], b"abc\0");
        assert_eq!(node.len(), 20);

        Ok(())
    }

    #[test]
    fn rejects_bad_marker() {
        let strings = StringBlock::default();
        let input = [0u8; 16];

        assert!(matches!(
            decode(&input, &strings),
            Err(Error::InvalidNode { offset: 4, .. })
        ));
    }

    #[test]
    fn rejects_truncated_children() {
        let strings = StringBlock::default();

        #[rustfmt::skip]
        let input = [
            0x00, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x15, 0x03,
            0x05, 0x00, 0x00, 0x00,
            0x40, 0x00, 0x00, 0x00,
        ];

        assert!(matches!(
            decode(&input, &strings),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn root_must_be_an_object() {
        let mut strings = StringBlock::default();
        assert!(matches!(
            encode(&json!([1, 2]), &mut strings),
            Err(Error::Unrepresentable(_))
        ));
    }
}
