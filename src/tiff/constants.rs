//! TIFF format constants
//!
//! This module defines constants used throughout the TIFF processing code:
//! header markers, field type ids, the tag ids of directory pointers and the
//! on-disk layouts of the structures the walker reads.

use crate::io::field_reader::{FieldDescriptor, FieldKind};

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// Size of the classic TIFF header
    pub const HEADER_SIZE: usize = 8;
}

/// Field type ids of TIFF 6.0
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// Tags whose value is the offset of another IFD
pub mod pointer_tags {
    pub const SUB_IFDS: u16 = 330;
    pub const EXIF_IFD: u16 = 34665;
    pub const GPS_INFO: u16 = 34853;
}

/// Bytes available in an entry's data field before values move out of line
pub const INLINE_CAPACITY: u64 = 4;

/// Byte order marker, version and offset of the first IFD
pub const FILE_HEADER: [FieldDescriptor; 3] = [
    FieldDescriptor::new("endian", 0, 2, FieldKind::Str),
    FieldDescriptor::new("version", 2, 2, FieldKind::UInt),
    FieldDescriptor::new("img_dir_offset", 4, 4, FieldKind::UInt),
];

/// Number of entries in a directory
pub const IFD_HEADER: [FieldDescriptor; 1] = [
    FieldDescriptor::new("num_records", 0, 2, FieldKind::UInt),
];

/// One 12-byte directory entry
pub const IFD_RECORD: [FieldDescriptor; 4] = [
    FieldDescriptor::new("tag", 0, 2, FieldKind::UInt),
    FieldDescriptor::new("type", 2, 2, FieldKind::UInt),
    FieldDescriptor::new("count", 4, 4, FieldKind::UInt),
    FieldDescriptor::new("data", 8, 4, FieldKind::UInt),
];

/// Offset of the next directory, following the last entry
pub const IFD_NEXT: [FieldDescriptor; 1] = [
    FieldDescriptor::new("next_offset", 0, 4, FieldKind::UInt),
];
