//! TIFF document walker
//!
//! Reads the file header, follows the primary IFD chain and then resolves
//! every ExifIFD, GPSInfo and SubIFDs pointer it finds, including pointers
//! inside directories reached that way. Each offset is visited at most once;
//! a second visit is reported as `CyclicDirectory`.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::Path;
use log::{debug, info, warn};

use crate::io::byte_order::ByteOrder;
use crate::io::field_reader::FieldReader;
use crate::tiff::constants::{header, FILE_HEADER};
use crate::tiff::entry::DirectoryEntry;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{DirectorySource, ImageFileDirectory};

/// Tag names reported in the camera group
pub const CAMERA_FIELDS: [&str; 5] = [
    "BodySerialNumber", "CameraOwnerName", "CameraSerialNumber", "Make", "Model",
];

/// Tag names reported in the lens group
pub const LENS_FIELDS: [&str; 3] = ["LensModel", "LensSerialNumber", "LensSpecification"];

/// Tag names reported in the image group
pub const IMAGE_FIELDS: [&str; 22] = [
    "ApertureValue", "Artist", "Copyright", "DateTime",
    "ExposureMode", "ExposureTime", "Flash", "FNumber",
    "FocalLength", "ImageDescription", "ImageHeight",
    "ImageWidth", "ISOSpeedRatings", "MeteringMode",
    "SceneCaptureType", "SelfTimeMode", "ShutterSpeedValue",
    "Software", "SubjectDistanceRange", "WhiteBalance",
    "FocalPlaneXResolution", "FocalPlaneYResolution",
];

/// Interest group of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Camera,
    Lens,
    Image,
}

impl Category {
    /// Group a tag name belongs to, if any
    pub fn of(tag_name: &str) -> Option<Self> {
        if CAMERA_FIELDS.contains(&tag_name) {
            Some(Category::Camera)
        } else if LENS_FIELDS.contains(&tag_name) {
            Some(Category::Lens)
        } else if IMAGE_FIELDS.contains(&tag_name) {
            Some(Category::Image)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Camera => "camera",
            Category::Lens => "lens",
            Category::Image => "image",
        }
    }
}

/// Records grouped by interest category
///
/// Tags repeated across directories (for example the dimensions of a
/// preview image and of the main image) all appear, in discovery order.
#[derive(Debug, Default)]
pub struct InterestingRecords<'a> {
    pub camera: Vec<&'a DirectoryEntry>,
    pub lens: Vec<&'a DirectoryEntry>,
    pub image: Vec<&'a DirectoryEntry>,
}

impl<'a> InterestingRecords<'a> {
    /// Records of one group
    pub fn get(&self, category: Category) -> &[&'a DirectoryEntry] {
        match category {
            Category::Camera => &self.camera,
            Category::Lens => &self.lens,
            Category::Image => &self.image,
        }
    }

    /// Total number of grouped records
    pub fn len(&self) -> usize {
        self.camera.len() + self.lens.len() + self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The fixed 8-byte TIFF header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Byte order used by every multi-byte field in the file
    pub byte_order: ByteOrder,
    /// Format version, 42 for classic TIFF
    pub version: u16,
    /// Offset of the first IFD, 0 when the file has none
    pub first_ifd_offset: u32,
}

impl FileHeader {
    /// Reads the header through a reader already set to the file's byte order
    pub fn read(reader: &FieldReader) -> TiffResult<Self> {
        if reader.len() < header::HEADER_SIZE {
            return Err(TiffError::MalformedHeader(format!(
                "file holds {} bytes, header needs {}",
                reader.len(),
                header::HEADER_SIZE
            )));
        }

        let fields = reader.read_fields(&FILE_HEADER, 0)?;
        let endian = fields.str("endian")?;
        let version = fields.uint("version")? as u16;
        let first_ifd_offset = fields.uint("img_dir_offset")? as u32;

        debug!("Header: endian={}, version={}, first IFD at {}", endian, version, first_ifd_offset);
        if version != header::TIFF_VERSION {
            warn!("Unexpected TIFF version {}, decoding as classic TIFF", version);
        }

        Ok(FileHeader {
            byte_order: reader.byte_order(),
            version,
            first_ifd_offset,
        })
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Byte order: {}", self.byte_order.name())?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "First IFD offset: {}", self.first_ifd_offset)
    }
}

/// A fully loaded TIFF document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    header: FileHeader,
    ifds: Vec<ImageFileDirectory>,
}

impl Document {
    /// Loads a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        info!("Loading TIFF file: {}", path.display());

        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Decodes a document from an in-memory byte source
    ///
    /// Every reachable directory is loaded before this returns. Any decoding
    /// error aborts the whole document.
    pub fn from_bytes(data: &[u8]) -> TiffResult<Self> {
        let byte_order = ByteOrder::detect(data)?;
        debug!("Detected byte order: {}", byte_order.name());

        let reader = FieldReader::new(data, byte_order);
        let header = FileHeader::read(&reader)?;
        let ifds = DirectoryWalker::new(&reader).walk(header.first_ifd_offset)?;

        info!("Loaded {} directories", ifds.len());
        Ok(Document { header, ifds })
    }

    /// The decoded file header
    pub fn file_header_fields(&self) -> &FileHeader {
        &self.header
    }

    /// Every loaded directory in discovery order
    pub fn directories(&self) -> &[ImageFileDirectory] {
        &self.ifds
    }

    /// Directories of the primary chain
    pub fn primary_directories(&self) -> impl Iterator<Item = &ImageFileDirectory> {
        self.ifds
            .iter()
            .filter(|ifd| matches!(ifd.source, DirectorySource::Primary(_)))
    }

    /// Entries of every directory, in directory discovery order
    pub fn all_records(&self) -> Vec<&DirectoryEntry> {
        self.ifds.iter().flat_map(|ifd| ifd.entries.iter()).collect()
    }

    /// Camera, lens and image records; other records are left out
    pub fn interesting_records(&self) -> InterestingRecords<'_> {
        let mut groups = InterestingRecords::default();

        for record in self.all_records() {
            match Category::of(record.tag_name()) {
                Some(Category::Camera) => groups.camera.push(record),
                Some(Category::Lens) => groups.lens.push(record),
                Some(Category::Image) => groups.image.push(record),
                None => {}
            }
        }

        groups
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        write!(f, "{}", self.header)?;
        writeln!(f, "Number of IFDs: {}", self.ifds.len())?;

        for ifd in &self.ifds {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}

/// Loads directories, refusing to visit any offset twice
struct DirectoryWalker<'r, 'a> {
    reader: &'r FieldReader<'a>,
    visited: HashSet<u32>,
    ifds: Vec<ImageFileDirectory>,
}

impl<'r, 'a> DirectoryWalker<'r, 'a> {
    fn new(reader: &'r FieldReader<'a>) -> Self {
        DirectoryWalker {
            reader,
            visited: HashSet::new(),
            ifds: Vec::new(),
        }
    }

    fn walk(mut self, first_ifd_offset: u32) -> TiffResult<Vec<ImageFileDirectory>> {
        self.read_primary_chain(first_ifd_offset)?;
        self.resolve_pointers()?;
        Ok(self.ifds)
    }

    fn visit(&mut self, offset: u32, source: DirectorySource) -> TiffResult<ImageFileDirectory> {
        if !self.visited.insert(offset) {
            warn!("{} at offset {} was already loaded", source, offset);
            return Err(TiffError::CyclicDirectory(offset));
        }
        ImageFileDirectory::read(self.reader, offset, source)
    }

    fn read_primary_chain(&mut self, first_ifd_offset: u32) -> TiffResult<()> {
        let mut offset = first_ifd_offset;
        let mut index = 0;

        while offset != 0 {
            let ifd = self.visit(offset, DirectorySource::Primary(index))?;
            offset = ifd.next_offset;
            self.ifds.push(ifd);
            index += 1;
        }

        debug!("Primary chain holds {} directories", index);
        Ok(())
    }

    // Pointer directories are single directories; their next offset is not followed
    fn resolve_pointers(&mut self) -> TiffResult<()> {
        let mut pending: VecDeque<(u32, DirectorySource)> =
            self.ifds.iter().flat_map(pointer_targets).collect();

        while let Some((offset, source)) = pending.pop_front() {
            let ifd = self.visit(offset, source)?;
            pending.extend(pointer_targets(&ifd));
            self.ifds.push(ifd);
        }

        Ok(())
    }
}

fn pointer_targets(ifd: &ImageFileDirectory) -> Vec<(u32, DirectorySource)> {
    let mut targets = Vec::new();

    for entry in ifd.pointer_entries() {
        let Some(source) = DirectorySource::from_pointer(entry.tag_name()) else {
            continue;
        };

        let offsets = entry.pointer_offsets();
        if offsets.is_empty() {
            warn!("{} in {} holds no usable offset: {}", entry.tag_name(), ifd.source, entry.value);
        }

        for offset in offsets {
            if offset == 0 {
                warn!("Skipping null {} pointer in {}", entry.tag_name(), ifd.source);
                continue;
            }
            targets.push((offset, source));
        }
    }

    targets
}
