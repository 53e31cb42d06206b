//! Image File Directory (IFD) structures and methods
//!
//! An IFD is a 2-byte entry count, that many 12-byte entries, and a 4-byte
//! offset of the next directory in the chain (0 ends the chain). Reading a
//! directory never follows pointer tags; the document walker does that.

use std::fmt;
use log::{debug, info, trace};

use crate::io::field_reader::FieldReader;
use crate::tiff::constants::{IFD_HEADER, IFD_NEXT};
use crate::tiff::entry::DirectoryEntry;
use crate::tiff::errors::TiffResult;
use crate::utils::ifd_utils;

/// How a directory was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorySource {
    /// Position in the primary chain (0-based)
    Primary(usize),
    /// Target of an ExifIFD pointer
    Exif,
    /// Target of a GPSInfo pointer
    Gps,
    /// Target of a SubIFDs pointer
    SubIfd,
}

impl DirectorySource {
    /// Source for a directory reached through the named pointer tag
    pub fn from_pointer(tag_name: &str) -> Option<Self> {
        match tag_name {
            "ExifIFD" => Some(DirectorySource::Exif),
            "GPSInfo" => Some(DirectorySource::Gps),
            "SubIFDs" => Some(DirectorySource::SubIfd),
            _ => None,
        }
    }
}

impl fmt::Display for DirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectorySource::Primary(n) => write!(f, "IFD #{}", n),
            DirectorySource::Exif => write!(f, "EXIF IFD"),
            DirectorySource::Gps => write!(f, "GPS IFD"),
            DirectorySource::SubIfd => write!(f, "Sub-IFD"),
        }
    }
}

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFileDirectory {
    /// Offset of this IFD in the file
    pub offset: u32,
    /// How this IFD was discovered
    pub source: DirectorySource,
    /// Entries in on-disk order
    pub entries: Vec<DirectoryEntry>,
    /// Offset of the next IFD in the chain, 0 when this one is last
    pub next_offset: u32,
}

impl ImageFileDirectory {
    /// Reads the directory at `offset`
    pub fn read(reader: &FieldReader, offset: u32, source: DirectorySource) -> TiffResult<Self> {
        let base = offset as u64;
        let header = reader.read_fields(&IFD_HEADER, base)?;
        let entry_count = header.uint("num_records")? as usize;
        debug!("{} at offset {}: {} entries", source, offset, entry_count);

        let mut entries = Vec::with_capacity(entry_count);
        for index in 0..entry_count {
            let entry = DirectoryEntry::read(reader, ifd_utils::entry_offset(base, index))?;
            trace!("{} entry {}: {}", source, index, entry.tag_name());
            entries.push(entry);
        }

        let next = reader.read_fields(&IFD_NEXT, ifd_utils::next_offset_position(base, entries.len()))?;
        let next_offset = next.uint("next_offset")? as u32;

        info!("Read {} with {} entries, next offset {}", source, entries.len(), next_offset);

        Ok(ImageFileDirectory {
            offset,
            source,
            entries,
            next_offset,
        })
    }

    /// Entries in on-disk order
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    /// Bytes covered by the count, the entries and the next pointer
    pub fn size_on_disk(&self) -> u64 {
        ifd_utils::calculate_ifd_size(self.entries.len())
    }

    /// Whether this is the last directory of its chain
    pub fn is_terminal(&self) -> bool {
        self.next_offset == 0
    }

    /// First entry with the given tag
    pub fn get_entry(&self, tag: u16) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Entries that point at further directories
    pub fn pointer_entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter().filter(|entry| entry.is_pointer())
    }
}

impl fmt::Display for ImageFileDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (offset: {})", self.source, self.offset)?;
        writeln!(f, "  Number of entries: {} ({} bytes)", self.entries.len(), self.size_on_disk())?;
        writeln!(f, "  Next IFD offset: {}", self.next_offset)?;

        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            let location = match entry.data_offset() {
                Some(offset) => format!("@{}", offset),
                None => "inline".to_string(),
            };
            let marker = if entry.is_pointer() { " ->" } else { "" };
            writeln!(f, "    {:>5} {:<28} {:<9} x{:<4} {:<10} {}{}",
                     entry.tag, entry.tag_name(), entry.field_type.name(),
                     entry.count, location, entry.value, marker)?;
        }

        Ok(())
    }
}
