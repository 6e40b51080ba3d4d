//! End-to-end tests for Nikon NEF files.

use std::f64::consts::PI;
use std::fs;

use raw_preview::{
    ExtractError, FileReader, ImageCodec, IoError, NefParser, ParseOptions, PassthroughCodec,
    RawFileInfo, RawParser, TiffError,
};

use super::test_utils::{
    create_nef, is_valid_jpeg, sample_created, write_sample, ByteOrderType, RawFixture,
};

#[test]
fn test_nef_extracts_jpeg_from_sub_ifd() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian).with_orientation(8);
    let path = write_sample(dir.path(), "DSC_0001.NEF", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 90);
    let parsed = NefParser::new()
        .process_file(&info, &ImageCodec::new(), &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.jpeg_path, dest.path().join("DSC_0001.NEF_extracted.jpg"));
    assert_eq!(parsed.created, Some(sample_created()));
    assert!((parsed.orientation_radians - 3.0 * PI / 2.0).abs() < 1e-12);

    let written = fs::read(&parsed.jpeg_path).unwrap();
    assert!(is_valid_jpeg(&written));
}

#[test]
fn test_nef_little_endian_passthrough() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::LittleEndian);
    let path = write_sample(dir.path(), "DSC_0002.NEF", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let parsed = NefParser::new()
        .process_file(&info, &PassthroughCodec, &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.orientation_radians, 0.0);
    assert_eq!(fs::read(&parsed.jpeg_path).unwrap(), fixture.jpeg);
}

#[test]
fn test_nef_inspect_has_no_container() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian);
    let path = write_sample(dir.path(), "DSC_0003.NEF", &create_nef(&fixture));

    let reader = FileReader::open(&path).unwrap();
    let inspection = NefParser::new()
        .inspect(&reader, &ParseOptions::default())
        .unwrap();

    assert_eq!(inspection.format, "NEF");
    assert_eq!(inspection.header.root_ifd_offset, 8);
    assert!(inspection.container.is_none());
    assert_eq!(inspection.descriptor.byte_length, fixture.jpeg.len() as u64);
    assert_eq!(inspection.descriptor.x_resolution.ratio, 300.0);
    assert_eq!(inspection.created, Some(sample_created()));
}

#[test]
fn test_nef_without_sub_ifd_jpeg_is_missing_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian).without_jpeg_tags();
    let path = write_sample(dir.path(), "DSC_0004.NEF", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let result = NefParser::new().process_file(&info, &ImageCodec::new(), &ParseOptions::default());

    assert!(matches!(result, Err(ExtractError::MissingJpeg { length: 0 })));
    assert!(!dest.path().join("DSC_0004.NEF_extracted.jpg").exists());
}

#[test]
fn test_nef_unreadable_exif_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian).with_broken_exif();
    let path = write_sample(dir.path(), "DSC_0005.NEF", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let result = NefParser::new().process_file(&info, &PassthroughCodec, &ParseOptions::default());

    assert!(matches!(
        result,
        Err(ExtractError::Tiff(TiffError::Io(IoError::ShortRead { .. })))
    ));
}

#[test]
fn test_nef_without_date() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian).with_date(None);
    let path = write_sample(dir.path(), "DSC_0006.NEF", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let parsed = NefParser::new()
        .process_file(&info, &PassthroughCodec, &ParseOptions::default())
        .unwrap();

    assert_eq!(parsed.created, None);
    assert!(parsed.jpeg_path.exists());
}

#[test]
fn test_nef_truncated_header_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "DSC_0007.NEF", b"MM\x00");

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let result = NefParser::new().process_file(&info, &PassthroughCodec, &ParseOptions::default());

    assert!(matches!(
        result,
        Err(ExtractError::Tiff(TiffError::Io(IoError::ShortRead { .. })))
    ));
}
