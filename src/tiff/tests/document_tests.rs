//! Tests for the document walker

extern crate std;

use super::test_utils::{ifd_size, TiffBuffer};
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::pointer_tags;
use crate::tiff::document::{Category, Document, CAMERA_FIELDS};
use crate::tiff::entry::Value;
use crate::tiff::errors::TiffError;
use crate::tiff::ifd::DirectorySource;

/// Primary IFD with Make, Model and an ExifIFD pointer; the EXIF IFD holds
/// ExposureTime, LensModel and a GPSInfo pointer to a one-entry GPS IFD.
fn camera_file(order: ByteOrder) -> Vec<u8> {
    let primary = 8;
    let exif = primary + ifd_size(4);
    let gps = exif + ifd_size(3);
    let strings = gps + ifd_size(1);
    let make = strings;
    let model = make + 6;
    let lens = model + 10;
    let exposure = lens + 12;

    let mut buffer = TiffBuffer::with_header(order, primary);
    buffer.u16(4);
    buffer.entry(271, 2, 6, make);
    buffer.entry(272, 2, 10, model);
    buffer.short_entry(274, 1);
    buffer.long_entry(pointer_tags::EXIF_IFD, exif);
    buffer.u32(0);

    buffer.u16(3);
    buffer.entry(33434, 5, 1, exposure);
    buffer.entry(42036, 2, 12, lens);
    buffer.long_entry(pointer_tags::GPS_INFO, gps);
    buffer.u32(0);

    buffer.u16(1);
    buffer.raw_entry(0, 1, 4, [2, 3, 0, 0]);
    buffer.u32(0);

    buffer.raw(b"Canon\0");
    buffer.raw(b"EOS 5D M3\0");
    buffer.raw(b"EF24-70mm\0\0\0");
    buffer.u32(1).u32(125);
    buffer.bytes
}

/// Primary chain of `count` single-entry IFDs; entry `i` is ImageWidth = i
fn chain_file(order: ByteOrder, count: u32) -> Vec<u8> {
    let mut buffer = TiffBuffer::with_header(order, 8);
    for i in 0..count {
        let next = if i + 1 == count { 0 } else { 8 + (i + 1) * ifd_size(1) };
        buffer.u16(1);
        buffer.long_entry(256, i);
        buffer.u32(next);
    }
    buffer.bytes
}

#[test]
fn test_reads_simple_document() {
    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(2);
    buffer.long_entry(256, 200);
    buffer.long_entry(257, 100);
    buffer.u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    let header = document.file_header_fields();
    std::assert_eq!(header.byte_order, ByteOrder::LittleEndian);
    std::assert_eq!(header.version, 42);
    std::assert_eq!(header.first_ifd_offset, 8);

    std::assert_eq!(document.directories().len(), 1);
    let records = document.all_records();
    std::assert_eq!(records.len(), 2);
    std::assert_eq!(records[0].value, Value::Long(200));
    std::assert_eq!(records[1].value, Value::Long(100));
}

#[test]
fn test_short_file_is_malformed() {
    std::assert!(matches!(Document::from_bytes(b"II*\0"), Err(TiffError::MalformedHeader(_))));
    std::assert!(matches!(Document::from_bytes(b""), Err(TiffError::MalformedHeader(_))));
}

#[test]
fn test_bad_marker_is_malformed() {
    let data = [0x49, 0x4D, 42, 0, 8, 0, 0, 0];
    std::assert!(matches!(Document::from_bytes(&data), Err(TiffError::MalformedHeader(_))));
}

#[test]
fn test_zero_first_offset_yields_no_directories() {
    let buffer = TiffBuffer::with_header(ByteOrder::BigEndian, 0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    std::assert!(document.directories().is_empty());
    std::assert!(document.all_records().is_empty());
    std::assert!(document.interesting_records().is_empty());
}

#[test]
fn test_three_directory_chain_in_order() {
    let data = chain_file(ByteOrder::LittleEndian, 3);
    let document = Document::from_bytes(&data).unwrap();

    let offsets: Vec<u32> = document.directories().iter().map(|ifd| ifd.offset).collect();
    std::assert_eq!(offsets, vec![8, 8 + ifd_size(1), 8 + 2 * ifd_size(1)]);

    let sources: Vec<DirectorySource> = document.directories().iter().map(|ifd| ifd.source).collect();
    std::assert_eq!(
        sources,
        vec![DirectorySource::Primary(0), DirectorySource::Primary(1), DirectorySource::Primary(2)]
    );

    let widths: Vec<&Value> = document.all_records().iter().map(|r| &r.value).collect();
    std::assert_eq!(widths, vec![&Value::Long(0), &Value::Long(1), &Value::Long(2)]);
    std::assert_eq!(document.primary_directories().count(), 3);
}

#[test]
fn test_cyclic_chain_is_rejected() {
    let second = 8 + ifd_size(1);
    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(1).long_entry(256, 1).u32(second);
    buffer.u16(1).long_entry(256, 2).u32(8);

    std::assert!(matches!(Document::from_bytes(&buffer.bytes), Err(TiffError::CyclicDirectory(8))));
}

#[test]
fn test_self_referencing_directory_is_rejected() {
    let mut buffer = TiffBuffer::with_header(ByteOrder::BigEndian, 8);
    buffer.u16(0).u32(8);

    std::assert!(matches!(Document::from_bytes(&buffer.bytes), Err(TiffError::CyclicDirectory(8))));
}

#[test]
fn test_exif_pointer_loads_directory() {
    let data = camera_file(ByteOrder::LittleEndian);
    let document = Document::from_bytes(&data).unwrap();

    let sources: Vec<DirectorySource> = document.directories().iter().map(|ifd| ifd.source).collect();
    std::assert_eq!(
        sources,
        vec![DirectorySource::Primary(0), DirectorySource::Exif, DirectorySource::Gps]
    );

    let names: Vec<&str> = document.all_records().iter().map(|r| r.tag_name()).collect();
    std::assert_eq!(
        names,
        vec![
            "Make", "Model", "Orientation", "ExifIFD",
            "ExposureTime", "LensModel", "GPSInfo",
            "(unknown)",
        ]
    );

    let exposure = document.all_records()[4];
    std::assert_eq!(exposure.value, Value::Rational(1, 125));
}

#[test]
fn test_pointer_directory_next_offset_is_not_followed() {
    // EXIF IFD claims a successor at a valid directory that nothing else references
    let primary = 8;
    let exif = primary + ifd_size(1);
    let orphan = exif + ifd_size(1);

    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, primary);
    buffer.u16(1).long_entry(pointer_tags::EXIF_IFD, exif).u32(0);
    buffer.u16(1).short_entry(41986, 0).u32(orphan);
    buffer.u16(1).short_entry(41987, 1).u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    std::assert_eq!(document.directories().len(), 2);
    std::assert_eq!(document.directories()[1].next_offset, orphan);
    std::assert!(document.all_records().iter().all(|r| r.tag != 41987));
}

#[test]
fn test_sub_ifds_load_every_listed_offset() {
    let primary = 8;
    let first = primary + ifd_size(1) + 8;
    let second = first + ifd_size(1);

    let mut buffer = TiffBuffer::with_header(ByteOrder::BigEndian, primary);
    buffer.u16(1).entry(pointer_tags::SUB_IFDS, 4, 2, primary + ifd_size(1)).u32(0);
    buffer.u32(first).u32(second);
    buffer.u16(1).long_entry(256, 4000).u32(0);
    buffer.u16(1).long_entry(256, 160).u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    let subs: Vec<u32> = document
        .directories()
        .iter()
        .filter(|ifd| ifd.source == DirectorySource::SubIfd)
        .map(|ifd| ifd.offset)
        .collect();
    std::assert_eq!(subs, vec![first, second]);

    let widths: Vec<&Value> = document.interesting_records().image.iter().map(|r| &r.value).collect();
    std::assert_eq!(widths, vec![&Value::Long(4000), &Value::Long(160)]);
}

#[test]
fn test_pointer_back_into_loaded_directory_is_rejected() {
    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(1).long_entry(pointer_tags::EXIF_IFD, 8).u32(0);

    std::assert!(matches!(Document::from_bytes(&buffer.bytes), Err(TiffError::CyclicDirectory(8))));
}

#[test]
fn test_null_pointer_is_skipped() {
    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(1).long_entry(pointer_tags::GPS_INFO, 0).u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    std::assert_eq!(document.directories().len(), 1);
}

#[test]
fn test_unknown_type_in_referenced_directory_aborts() {
    let exif = 8 + ifd_size(1);
    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(1).long_entry(pointer_tags::EXIF_IFD, exif).u32(0);
    buffer.u16(1).entry(33434, 99, 1, 0).u32(0);

    std::assert!(matches!(
        Document::from_bytes(&buffer.bytes),
        Err(TiffError::UnknownType { tag: 33434, type_id: 99 })
    ));
}

#[test]
fn test_interesting_records_are_grouped_by_name() {
    let data = camera_file(ByteOrder::LittleEndian);
    let document = Document::from_bytes(&data).unwrap();
    let groups = document.interesting_records();

    let camera: Vec<&str> = groups.camera.iter().map(|r| r.tag_name()).collect();
    std::assert_eq!(camera, vec!["Make", "Model"]);
    std::assert!(groups.camera.iter().all(|r| CAMERA_FIELDS.contains(&r.tag_name())));

    let lens: Vec<&Value> = groups.lens.iter().map(|r| &r.value).collect();
    std::assert_eq!(lens, vec![&Value::Ascii("EF24-70mm".to_string())]);

    let image: Vec<&str> = groups.get(Category::Image).iter().map(|r| r.tag_name()).collect();
    std::assert_eq!(image, vec!["ExposureTime"]);

    std::assert_eq!(groups.len(), 4);
}

#[test]
fn test_byte_order_does_not_change_decoded_values() {
    let little = Document::from_bytes(&camera_file(ByteOrder::LittleEndian)).unwrap();
    let big = Document::from_bytes(&camera_file(ByteOrder::BigEndian)).unwrap();

    let little_values: Vec<&Value> = little.all_records().iter().map(|r| &r.value).collect();
    let big_values: Vec<&Value> = big.all_records().iter().map(|r| &r.value).collect();
    std::assert_eq!(little_values, big_values);
    std::assert_eq!(big.file_header_fields().byte_order, ByteOrder::BigEndian);
}

#[test]
fn test_category_lookup() {
    std::assert_eq!(Category::of("Model"), Some(Category::Camera));
    std::assert_eq!(Category::of("LensSerialNumber"), Some(Category::Lens));
    std::assert_eq!(Category::of("FocalPlaneYResolution"), Some(Category::Image));
    std::assert_eq!(Category::of("Orientation"), None);
    std::assert_eq!(Category::of("(unknown)"), None);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = Document::open("/nonexistent/exifwalk/missing.tif");
    std::assert!(matches!(result, Err(TiffError::IoError(_))));
}

#[test]
fn test_unexpected_version_is_accepted() {
    let mut buffer = TiffBuffer::new(ByteOrder::LittleEndian);
    buffer.raw(b"II").u16(43).u32(8);
    buffer.u16(1).long_entry(256, 10).u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    std::assert_eq!(document.file_header_fields().version, 43);
    std::assert_eq!(document.directories().len(), 1);
    std::assert_eq!(document.all_records()[0].value, Value::Long(10));
}

#[test]
fn test_non_integer_pointers_are_skipped() {
    let mut buffer = TiffBuffer::with_header(ByteOrder::BigEndian, 8);
    buffer.u16(2);
    buffer.raw_entry(pointer_tags::GPS_INFO, 7, 4, [0, 0, 0, 38]);
    buffer.raw_entry(pointer_tags::EXIF_IFD, 2, 4, *b"38\0\0");
    buffer.u32(0);

    let document = Document::from_bytes(&buffer.bytes).unwrap();
    std::assert_eq!(document.directories().len(), 1);

    let records = document.all_records();
    std::assert!(records.iter().all(|r| r.is_pointer()));
    std::assert!(records.iter().all(|r| r.pointer_offsets().is_empty()));
}

#[test]
fn test_shared_pointer_target_is_rejected() {
    let second = 8 + ifd_size(1);
    let exif = second + ifd_size(1);

    let mut buffer = TiffBuffer::with_header(ByteOrder::LittleEndian, 8);
    buffer.u16(1).long_entry(pointer_tags::EXIF_IFD, exif).u32(second);
    buffer.u16(1).long_entry(pointer_tags::EXIF_IFD, exif).u32(0);
    buffer.u16(0).u32(0);

    std::assert!(matches!(
        Document::from_bytes(&buffer.bytes),
        Err(TiffError::CyclicDirectory(offset)) if offset == exif
    ));
}

#[test]
fn test_document_rendering_lists_every_directory() {
    let document = Document::from_bytes(&camera_file(ByteOrder::LittleEndian)).unwrap();
    let rendered = document.to_string();

    std::assert!(rendered.starts_with("TIFF File:"));
    std::assert!(rendered.contains("Version: 42"));
    std::assert!(rendered.contains("Number of IFDs: 3"));
    std::assert!(rendered.contains("IFD #0 (offset: 8)"));
    std::assert!(rendered.contains("EXIF IFD (offset: 62)"));
    std::assert!(rendered.contains("GPS IFD (offset: 104)"));
    std::assert!(rendered.contains("1/125"));
    std::assert!(rendered.contains("EF24-70mm"));

    let exif_line = rendered
        .lines()
        .find(|line| line.contains("ExifIFD"))
        .unwrap();
    std::assert!(exif_line.contains("inline"));
    std::assert!(exif_line.ends_with(" ->"));
}
