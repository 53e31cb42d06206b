//! Directory entry decoding
//!
//! A directory entry is a fixed 12-byte record: tag, field type, element
//! count and a 4-byte data field. When the entry's data fits in those four
//! bytes the data field holds the value itself, left-justified; otherwise it
//! holds the absolute offset of the value bytes.

use std::fmt;
use log::{debug, trace};

use crate::io::field_reader::{FieldKind, FieldLayout, FieldReader, FieldValue};
use crate::tiff::constants::{INLINE_CAPACITY, IFD_RECORD};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::tags;
use crate::tiff::types::FieldType;
use crate::utils::string_utils;

/// A decoded entry value
///
/// Byte, ASCII, signed byte and undefined data is always a single block.
/// Other types decode to one scalar when the count is 1 and to a `List`
/// otherwise. Rationals are (numerator, denominator) pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bytes(Vec<u8>),
    Ascii(String),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
    SBytes(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(i16),
    SLong(i32),
    SRational(i32, i32),
    Float(f32),
    Double(f64),
    List(Vec<Value>),
}

impl Value {
    /// Unsigned rational pairs, one per element
    pub fn rationals(&self) -> Option<Vec<(u32, u32)>> {
        match self {
            Value::Rational(n, d) => Some(vec![(*n, *d)]),
            Value::List(items) => items
                .iter()
                .map(|v| match v {
                    Value::Rational(n, d) => Some((*n, *d)),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Signed rational pairs, one per element
    pub fn srationals(&self) -> Option<Vec<(i32, i32)>> {
        match self {
            Value::SRational(n, d) => Some(vec![(*n, *d)]),
            Value::List(items) => items
                .iter()
                .map(|v| match v {
                    Value::SRational(n, d) => Some((*n, *d)),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// The value as a non-negative integer that fits a file offset
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Short(v) => Some(*v as u32),
            Value::Long(v) => Some(*v),
            Value::SShort(v) => u32::try_from(*v).ok(),
            Value::SLong(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Number of elements held; blocks count as one
    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(b) | Value::Undefined(b) => write!(f, "<{}>", string_utils::hex_preview(b, 16)),
            Value::SBytes(b) => write!(f, "{:?}", b),
            Value::Ascii(s) => write!(f, "{}", s),
            Value::Short(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::SShort(v) => write!(f, "{}", v),
            Value::SLong(v) => write!(f, "{}", v),
            Value::Rational(n, d) => write!(f, "{}/{}", n, d),
            Value::SRational(n, d) => write!(f, "{}/{}", n, d),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// One decoded entry of an Image File Directory
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    /// Absolute offset of the 12-byte record
    pub offset: u64,
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: FieldType,
    /// Number of elements of `field_type` (not bytes)
    pub count: u32,
    /// Raw data field, the value itself or the offset of the value bytes
    pub data_field: u32,
    /// Decoded value
    pub value: Value,
}

impl DirectoryEntry {
    /// Decodes the record at `offset`
    ///
    /// Fails with `UnknownType` when the field type has no table entry and
    /// with `TruncatedRead` when the record or its out-of-line data runs past
    /// the end of the byte source.
    pub fn read(reader: &FieldReader, offset: u64) -> TiffResult<Self> {
        let fields = reader.read_fields(&IFD_RECORD, offset)?;
        let tag = fields.uint("tag")? as u16;
        let type_id = fields.uint("type")? as u16;
        let count = fields.uint("count")? as u32;
        let data_field = fields.uint("data")? as u32;

        let field_type = FieldType::from_id(type_id)
            .ok_or(TiffError::UnknownType { tag, type_id })?;
        let byte_length = count as u64 * field_type.size() as u64;

        let value = if byte_length <= INLINE_CAPACITY {
            trace!("Tag {} value of {} bytes is inline", tag, byte_length);
            decode_inline(reader, field_type, count, data_field)?
        } else {
            trace!("Tag {} value of {} bytes at offset {}", tag, byte_length, data_field);
            fetch_out_of_line(reader, field_type, count, data_field as u64, byte_length)?
        };

        let entry = DirectoryEntry {
            offset,
            tag,
            field_type,
            count,
            data_field,
            value,
        };
        debug!("Read entry at {}: {} ({}) = {}", offset, entry.tag_name(), tag, entry.value);

        Ok(entry)
    }

    /// Symbolic tag name, `(unknown)` for tags missing from the dictionary
    pub fn tag_name(&self) -> &'static str {
        tags::tag_name(self.tag)
    }

    /// Size of the value in bytes
    pub fn byte_length(&self) -> u64 {
        self.count as u64 * self.field_type.size() as u64
    }

    /// Whether the value lives in the record's data field
    pub fn is_inline(&self) -> bool {
        self.byte_length() <= INLINE_CAPACITY
    }

    /// Offset the value was fetched from, `None` for inline values
    pub fn data_offset(&self) -> Option<u32> {
        if self.is_inline() {
            None
        } else {
            Some(self.data_field)
        }
    }

    /// Whether this entry points at another IFD
    pub fn is_pointer(&self) -> bool {
        tags::is_pointer_tag(self.tag_name())
    }

    /// The value reinterpreted as IFD offsets
    ///
    /// Integer elements that fit a file offset are returned in order, any
    /// other element is skipped.
    pub fn pointer_offsets(&self) -> Vec<u32> {
        match &self.value {
            Value::List(items) => items.iter().filter_map(Value::as_u32).collect(),
            value => value.as_u32().into_iter().collect(),
        }
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tag name: {}", self.tag_name())?;
        writeln!(f, "Tag value: {}", self.tag)?;
        writeln!(f, "Type: {}", self.field_type)?;
        writeln!(f, "Total bytes: {}", self.byte_length())?;
        writeln!(f, "Data: {}", self.value)
    }
}

fn decode_inline(reader: &FieldReader, field_type: FieldType, count: u32, data_field: u32) -> TiffResult<Value> {
    let raw = FieldValue::UInt(data_field as u64);
    let inline = FieldLayout::single(FieldKind::UInt, INLINE_CAPACITY as usize);

    if field_type.is_block() {
        // Inline character and byte data is stored byte-for-byte, not as an integer
        let bytes = match reader
            .convert(&raw, inline, FieldLayout::single(FieldKind::Bytes, INLINE_CAPACITY as usize))?
            .pop()
        {
            Some(FieldValue::Bytes(bytes)) => bytes,
            other => {
                return Err(TiffError::GenericError(format!(
                    "Inline data field did not convert to bytes: {:?}",
                    other
                )))
            }
        };
        let mut data = &bytes[..count as usize];
        if field_type == FieldType::Ascii {
            // Inline strings end at the first NUL
            if let Some(end) = data.iter().position(|b| *b == 0) {
                data = &data[..end];
            }
        }
        return Ok(block_value(field_type, data));
    }

    let layout = FieldLayout::new(field_type.field_kind(), field_type.size(), count as usize);
    let elements = reader
        .convert(&raw, inline, layout)?
        .into_iter()
        .map(|element| scalar_value(field_type, element))
        .collect::<TiffResult<Vec<_>>>()?;

    Ok(collapse(elements))
}

fn fetch_out_of_line(
    reader: &FieldReader,
    field_type: FieldType,
    count: u32,
    offset: u64,
    byte_length: u64,
) -> TiffResult<Value> {
    if field_type.is_block() {
        let bytes = reader.read_block(offset, byte_length)?;
        return Ok(block_value(field_type, bytes));
    }

    let kind = field_type.field_kind();
    let layout = FieldLayout::new(kind, field_type.size(), count as usize);
    let elements = reader.read_values(offset, layout)?;

    let values = if field_type.is_rational() {
        let whole = FieldLayout::single(kind, 8);
        let halves = FieldLayout::new(kind, 4, 2);
        elements
            .iter()
            .map(|element| {
                let parts = reader.convert(element, whole, halves)?;
                rational_value(field_type, &parts)
            })
            .collect::<TiffResult<Vec<_>>>()?
    } else {
        elements
            .into_iter()
            .map(|element| scalar_value(field_type, element))
            .collect::<TiffResult<Vec<_>>>()?
    };

    Ok(collapse(values))
}

fn block_value(field_type: FieldType, bytes: &[u8]) -> Value {
    match field_type {
        FieldType::Ascii => {
            let mut buffer = bytes.to_vec();
            string_utils::trim_trailing_nulls(&mut buffer);
            Value::Ascii(String::from_utf8_lossy(&buffer).into_owned())
        }
        FieldType::SByte => Value::SBytes(bytes.iter().map(|b| *b as i8).collect()),
        FieldType::Undefined => Value::Undefined(bytes.to_vec()),
        _ => Value::Bytes(bytes.to_vec()),
    }
}

fn scalar_value(field_type: FieldType, element: FieldValue) -> TiffResult<Value> {
    let value = match (field_type, element) {
        (FieldType::Short, FieldValue::UInt(v)) => Value::Short(v as u16),
        (FieldType::Long, FieldValue::UInt(v)) => Value::Long(v as u32),
        (FieldType::SShort, FieldValue::Int(v)) => Value::SShort(v as i16),
        (FieldType::SLong, FieldValue::Int(v)) => Value::SLong(v as i32),
        (FieldType::Float, FieldValue::Float(v)) => Value::Float(v),
        (FieldType::Double, FieldValue::Double(v)) => Value::Double(v),
        (field_type, element) => {
            return Err(TiffError::GenericError(format!(
                "Field type {} cannot hold {:?}",
                field_type, element
            )))
        }
    };
    Ok(value)
}

fn rational_value(field_type: FieldType, parts: &[FieldValue]) -> TiffResult<Value> {
    match (field_type, parts) {
        (FieldType::Rational, [FieldValue::UInt(n), FieldValue::UInt(d)]) => {
            Ok(Value::Rational(*n as u32, *d as u32))
        }
        (FieldType::SRational, [FieldValue::Int(n), FieldValue::Int(d)]) => {
            Ok(Value::SRational(*n as i32, *d as i32))
        }
        _ => Err(TiffError::GenericError(format!(
            "Cannot build a {} from {:?}",
            field_type, parts
        ))),
    }
}

// A single element stands alone; rationals keep their pair shape
fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::List(values)
    }
}
