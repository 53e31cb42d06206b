//! IFD utilities
//!
//! Offset arithmetic for the fixed-size parts of an Image File Directory.

use crate::io::field_reader::field_set_size;
use crate::tiff::constants::{IFD_HEADER, IFD_NEXT, IFD_RECORD};

/// Size of one directory entry on disk
pub fn record_size() -> u64 {
    field_set_size(&IFD_RECORD) as u64
}

/// Absolute offset of entry `index` of the directory at `base`
pub fn entry_offset(base: u64, index: usize) -> u64 {
    base + field_set_size(&IFD_HEADER) as u64 + index as u64 * record_size()
}

/// Absolute offset of the next-directory pointer of a directory at `base`
pub fn next_offset_position(base: u64, entry_count: usize) -> u64 {
    entry_offset(base, entry_count)
}

/// Calculates the size of a directory in bytes
///
/// 2 (entry count) + 12 (each entry) + 4 (next IFD offset)
pub fn calculate_ifd_size(entry_count: usize) -> u64 {
    next_offset_position(0, entry_count) + field_set_size(&IFD_NEXT) as u64
}
