//! Endian-aware field reader over an in-memory byte source
//!
//! Fields are described by small layout tables (`FieldDescriptor`) and read
//! at explicit absolute offsets, so a `FieldReader` never tracks a read
//! position and can be shared freely between decoders of the same source.

use log::trace;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::string_utils;

/// How the bytes of a field are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned integer, 1 to 8 bytes
    UInt,
    /// Signed integer, 1 to 8 bytes
    Int,
    /// IEEE single precision
    Float,
    /// IEEE double precision
    Double,
    /// Raw bytes, kept as-is
    Bytes,
    /// Character data with trailing NULs removed
    Str,
}

/// A decoded field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt(u64),
    Int(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Str(String),
}

/// A named field at a fixed position inside a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name used as the lookup key in [`Fields`]
    pub name: &'static str,
    /// Offset relative to the structure's base offset
    pub offset: usize,
    /// Field width in bytes
    pub length: usize,
    /// Interpretation of the field bytes
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, offset: usize, length: usize, kind: FieldKind) -> Self {
        FieldDescriptor { name, offset, length, kind }
    }
}

/// A view of a byte run as `count` consecutive elements of `size` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub kind: FieldKind,
    pub size: usize,
    pub count: usize,
}

impl FieldLayout {
    pub const fn new(kind: FieldKind, size: usize, count: usize) -> Self {
        FieldLayout { kind, size, count }
    }

    /// Layout of a single element
    pub const fn single(kind: FieldKind, size: usize) -> Self {
        FieldLayout { kind, size, count: 1 }
    }

    /// Total number of bytes covered by this layout
    pub fn byte_length(&self) -> usize {
        self.size * self.count
    }
}

/// Decoded fields of one structure, in descriptor order
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    values: Vec<(&'static str, FieldValue)>,
}

impl Fields {
    /// Looks up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Returns an unsigned integer field
    pub fn uint(&self, name: &str) -> TiffResult<u64> {
        match self.get(name) {
            Some(FieldValue::UInt(v)) => Ok(*v),
            Some(other) => Err(TiffError::GenericError(format!(
                "Field '{}' is not an unsigned integer: {:?}",
                name, other
            ))),
            None => Err(TiffError::GenericError(format!("Field '{}' not present", name))),
        }
    }

    /// Returns a string field
    pub fn str(&self, name: &str) -> TiffResult<&str> {
        match self.get(name) {
            Some(FieldValue::Str(s)) => Ok(s),
            Some(other) => Err(TiffError::GenericError(format!(
                "Field '{}' is not a string: {:?}",
                name, other
            ))),
            None => Err(TiffError::GenericError(format!("Field '{}' not present", name))),
        }
    }

    /// Iterates over (name, value) pairs in descriptor order
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FieldValue)> {
        self.values.iter()
    }
}

/// Total byte span of a field list
pub fn field_set_size(fields: &[FieldDescriptor]) -> usize {
    fields.iter().map(|f| f.offset + f.length).max().unwrap_or(0)
}

/// Reads fields out of a byte source using a fixed byte order
pub struct FieldReader<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
}

impl<'a> FieldReader<'a> {
    /// Creates a reader over `data` decoding in `byte_order`
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        FieldReader {
            data,
            byte_order,
            handler: byte_order.create_handler(),
        }
    }

    /// The byte order this reader decodes with
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Size of the underlying byte source
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `length` bytes starting at the absolute `offset`
    pub fn read_block(&self, offset: u64, length: u64) -> TiffResult<&'a [u8]> {
        let truncated = || TiffError::TruncatedRead {
            offset,
            length,
            available: self.data.len(),
        };

        let end = offset.checked_add(length).ok_or_else(truncated)?;
        if end > self.data.len() as u64 {
            return Err(truncated());
        }

        Ok(&self.data[offset as usize..end as usize])
    }

    /// Reads every field of `fields` relative to `base`
    pub fn read_fields(&self, fields: &[FieldDescriptor], base: u64) -> TiffResult<Fields> {
        let mut values = Vec::with_capacity(fields.len());

        for field in fields {
            let bytes = self.read_block(base + field.offset as u64, field.length as u64)?;
            let value = self.decode_one(bytes, field.kind, field.length)?;
            trace!("Field '{}' at {}: {:?}", field.name, base + field.offset as u64, value);
            values.push((field.name, value));
        }

        Ok(Fields { values })
    }

    /// Reads `layout.count` consecutive elements starting at `offset`
    pub fn read_values(&self, offset: u64, layout: FieldLayout) -> TiffResult<Vec<FieldValue>> {
        let bytes = self.read_block(offset, layout.byte_length() as u64)?;
        self.decode_values(bytes, layout)
    }

    /// Decodes already-fetched bytes according to `layout`
    pub fn decode_values(&self, bytes: &[u8], layout: FieldLayout) -> TiffResult<Vec<FieldValue>> {
        if layout.count == 0 {
            return Ok(Vec::new());
        }
        if layout.size == 0 || bytes.len() < layout.byte_length() {
            return Err(TiffError::GenericError(format!(
                "Cannot view {} bytes as {} x {} byte {:?}",
                bytes.len(),
                layout.count,
                layout.size,
                layout.kind
            )));
        }

        bytes
            .chunks_exact(layout.size)
            .take(layout.count)
            .map(|chunk| self.decode_one(chunk, layout.kind, layout.size))
            .collect()
    }

    /// Reinterprets `value`, viewed as `from`, as the elements of `to`
    ///
    /// The value is re-encoded in this reader's byte order, so reinterpreting
    /// an integer read from the file yields the bytes as stored.
    pub fn convert(&self, value: &FieldValue, from: FieldLayout, to: FieldLayout) -> TiffResult<Vec<FieldValue>> {
        let bytes = self.encode(value, from)?;
        self.decode_values(&bytes, to)
    }

    fn encode(&self, value: &FieldValue, layout: FieldLayout) -> TiffResult<Vec<u8>> {
        let size = layout.byte_length();
        let mut buf = vec![0u8; size];

        match value {
            FieldValue::UInt(v) if (1..=8).contains(&size) => self.handler.write_uint(&mut buf, *v, size),
            FieldValue::Int(v) if (1..=8).contains(&size) => self.handler.write_uint(&mut buf, *v as u64, size),
            FieldValue::Float(v) if size == 4 => self.handler.write_uint(&mut buf, v.to_bits() as u64, 4),
            FieldValue::Double(v) if size == 8 => self.handler.write_uint(&mut buf, v.to_bits(), 8),
            FieldValue::Bytes(b) => return Ok(b.clone()),
            FieldValue::Str(s) => return Ok(s.as_bytes().to_vec()),
            other => {
                return Err(TiffError::GenericError(format!(
                    "Cannot encode {:?} as {} bytes",
                    other, size
                )))
            }
        }

        Ok(buf)
    }

    fn decode_one(&self, bytes: &[u8], kind: FieldKind, size: usize) -> TiffResult<FieldValue> {
        let bytes = &bytes[..size.min(bytes.len())];

        let value = match kind {
            FieldKind::UInt if (1..=8).contains(&size) => FieldValue::UInt(self.handler.read_uint(bytes, size)),
            FieldKind::Int if (1..=8).contains(&size) => FieldValue::Int(self.handler.read_int(bytes, size)),
            FieldKind::Float if size == 4 => FieldValue::Float(self.handler.read_f32(bytes)),
            FieldKind::Double if size == 8 => FieldValue::Double(self.handler.read_f64(bytes)),
            FieldKind::Bytes => FieldValue::Bytes(bytes.to_vec()),
            FieldKind::Str => {
                let mut buffer = bytes.to_vec();
                string_utils::trim_trailing_nulls(&mut buffer);
                FieldValue::Str(String::from_utf8_lossy(&buffer).into_owned())
            }
            _ => {
                return Err(TiffError::GenericError(format!(
                    "Unsupported width {} for {:?} field",
                    size, kind
                )))
            }
        };

        Ok(value)
    }
}
