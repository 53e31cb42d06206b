//! Byte order handling for TIFF files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when decoding TIFF data.
//! Handlers work on byte slices that the caller has already bounds-checked,
//! so they never carry a read position of their own.

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};

use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF header
    pub fn detect(bytes: &[u8]) -> TiffResult<Self> {
        if bytes.len() < 2 {
            return Err(TiffError::MalformedHeader(format!(
                "need 2 bytes for the byte order marker, got {}",
                bytes.len()
            )));
        }

        match [bytes[0], bytes[1]] {
            header::LITTLE_ENDIAN_MARKER => Ok(ByteOrder::LittleEndian),
            header::BIG_ENDIAN_MARKER => Ok(ByteOrder::BigEndian),
            marker => Err(TiffError::MalformedHeader(format!(
                "invalid byte order marker: {:#06x}",
                u16::from_be_bytes(marker)
            ))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// `size` is the element width in bytes (1 to 8) and `bytes` must hold at
/// least that many bytes.
pub trait ByteOrderHandler: Send + Sync {
    /// Read an unsigned integer of `size` bytes
    fn read_uint(&self, bytes: &[u8], size: usize) -> u64;

    /// Read a two's complement signed integer of `size` bytes
    fn read_int(&self, bytes: &[u8], size: usize) -> i64;

    /// Read an f32 value
    fn read_f32(&self, bytes: &[u8]) -> f32;

    /// Read an f64 value
    fn read_f64(&self, bytes: &[u8]) -> f64;

    /// Write the low `size` bytes of `value` into `buf`
    fn write_uint(&self, buf: &mut [u8], value: u64, size: usize);
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_uint(&self, bytes: &[u8], size: usize) -> u64 {
        LittleEndian::read_uint(bytes, size)
    }

    fn read_int(&self, bytes: &[u8], size: usize) -> i64 {
        LittleEndian::read_int(bytes, size)
    }

    fn read_f32(&self, bytes: &[u8]) -> f32 {
        LittleEndian::read_f32(bytes)
    }

    fn read_f64(&self, bytes: &[u8]) -> f64 {
        LittleEndian::read_f64(bytes)
    }

    fn write_uint(&self, buf: &mut [u8], value: u64, size: usize) {
        LittleEndian::write_uint(buf, truncate(value, size), size)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_uint(&self, bytes: &[u8], size: usize) -> u64 {
        BigEndian::read_uint(bytes, size)
    }

    fn read_int(&self, bytes: &[u8], size: usize) -> i64 {
        BigEndian::read_int(bytes, size)
    }

    fn read_f32(&self, bytes: &[u8]) -> f32 {
        BigEndian::read_f32(bytes)
    }

    fn read_f64(&self, bytes: &[u8]) -> f64 {
        BigEndian::read_f64(bytes)
    }

    fn write_uint(&self, buf: &mut [u8], value: u64, size: usize) {
        BigEndian::write_uint(buf, truncate(value, size), size)
    }
}

// write_uint asserts that the value fits in `size` bytes
fn truncate(value: u64, size: usize) -> u64 {
    if size >= 8 {
        value
    } else {
        value & ((1u64 << (size * 8)) - 1)
    }
}
