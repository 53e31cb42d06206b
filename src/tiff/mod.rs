//! TIFF/EXIF decoding module
//!
//! This module provides the type and tag tables, the directory entry
//! decoder, the Image File Directory reader and the document walker.

pub mod errors;
pub mod constants;
pub mod types;
pub mod tags;
pub mod entry;
pub mod ifd;
pub mod document;
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use document::{Category, Document, FileHeader, InterestingRecords};
pub use entry::{DirectoryEntry, Value};
pub use errors::{TiffError, TiffResult};
pub use ifd::{DirectorySource, ImageFileDirectory};
pub use tags::{is_pointer_tag, tag_name};
pub use types::FieldType;
