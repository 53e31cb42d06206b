//! Custom error types for TIFF/EXIF decoding

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error while opening or reading the source file
    IoError(io::Error),
    /// File header too short or byte order marker not recognized
    MalformedHeader(String),
    /// Directory entry with a field type that has no table entry
    UnknownType {
        /// Tag of the offending entry
        tag: u16,
        /// The unrecognized type id
        type_id: u16,
    },
    /// Requested byte range lies outside the byte source
    TruncatedRead {
        /// Absolute offset of the read
        offset: u64,
        /// Number of bytes requested
        length: u64,
        /// Size of the byte source
        available: usize,
    },
    /// A directory offset was visited twice
    ///
    /// Raised for loops in the IFD chain and also when two pointers share a
    /// target directory, which need not form a loop.
    CyclicDirectory(u32),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::MalformedHeader(msg) => write!(f, "Malformed TIFF header: {}", msg),
            TiffError::UnknownType { tag, type_id } => {
                write!(f, "Unknown field type {} in entry for tag {}", type_id, tag)
            }
            TiffError::TruncatedRead { offset, length, available } => write!(
                f,
                "Truncated read: {} bytes at offset {} (source holds {} bytes)",
                length, offset, available
            ),
            TiffError::CyclicDirectory(offset) => {
                write!(f, "Directory at offset {} was already visited", offset)
            }
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
