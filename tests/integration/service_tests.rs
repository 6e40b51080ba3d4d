//! Batch extraction and parser resolution tests.

use std::path::Path;
use std::sync::Arc;

use raw_preview::{
    detect_format, ExtractError, ExtractionService, FileReader, ImageCodec, ParseOptions,
    ParserRegistry, PassthroughCodec, RatioMode, RawFileInfo, RawFormat,
};

use super::test_utils::{create_cr2, create_nef, write_sample, ByteOrderType, RawFixture};

fn passthrough_service(jobs: usize) -> ExtractionService {
    ExtractionService::new(
        Arc::new(ParserRegistry::with_defaults()),
        Arc::new(PassthroughCodec),
        ParseOptions::default(),
        jobs,
    )
}

// =============================================================================
// Registry Resolution
// =============================================================================

#[test]
fn test_resolve_by_extension() {
    let registry = ParserRegistry::with_defaults();

    let parser = registry.resolve(Path::new("IMG_0001.cr2")).unwrap();
    assert_eq!(parser.key(), "CR2");

    let parser = registry.resolve(Path::new("DSC_0001.NEF")).unwrap();
    assert_eq!(parser.key(), "NEF");
}

#[test]
fn test_resolve_by_header_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let cr2 = write_sample(
        dir.path(),
        "canon_raw",
        &create_cr2(&RawFixture::new(ByteOrderType::LittleEndian)),
    );
    let nef = write_sample(
        dir.path(),
        "nikon_raw.bin",
        &create_nef(&RawFixture::new(ByteOrderType::BigEndian)),
    );

    let registry = ParserRegistry::with_defaults();
    assert_eq!(registry.resolve(&cr2).unwrap().key(), "CR2");
    assert_eq!(registry.resolve(&nef).unwrap().key(), "NEF");

    assert_eq!(
        detect_format(&FileReader::open(&cr2).unwrap()).unwrap(),
        RawFormat::Cr2
    );
}

#[test]
fn test_resolve_rejects_non_tiff() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "photo.png", b"\x89PNG\r\n\x1a\n0000");

    let registry = ParserRegistry::with_defaults();
    assert!(matches!(
        registry.resolve(&path),
        Err(ExtractError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_process_one_extensionless_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let fixture = RawFixture::new(ByteOrderType::BigEndian);
    let path = write_sample(dir.path(), "capture", &create_nef(&fixture));

    let info = RawFileInfo::new(&path, dest.path(), 75);
    let parsed = passthrough_service(1).process_one(&info).unwrap();

    assert_eq!(parsed.jpeg_path, dest.path().join("capture_extracted.jpg"));
    assert_eq!(std::fs::read(&parsed.jpeg_path).unwrap(), fixture.jpeg);
}

// =============================================================================
// Batch Processing
// =============================================================================

#[tokio::test]
async fn test_process_all_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    let mut files = Vec::new();
    for i in 0..6 {
        let (name, data) = if i % 2 == 0 {
            (
                format!("IMG_{i:04}.CR2"),
                create_cr2(&RawFixture::new(ByteOrderType::LittleEndian)),
            )
        } else {
            (
                format!("DSC_{i:04}.NEF"),
                create_nef(&RawFixture::new(ByteOrderType::BigEndian)),
            )
        };
        files.push(write_sample(dir.path(), &name, &data));
    }

    let results = passthrough_service(3)
        .process_all(files.clone(), dest.path(), 75)
        .await;

    assert_eq!(results.len(), files.len());
    for (file, result) in files.iter().zip(&results) {
        let parsed = result.as_ref().unwrap();
        assert_eq!(&parsed.source, file);
        assert!(parsed.jpeg_path.exists());
    }
}

#[tokio::test]
async fn test_process_all_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    let good = write_sample(
        dir.path(),
        "good.CR2",
        &create_cr2(&RawFixture::new(ByteOrderType::LittleEndian)),
    );
    let no_jpeg = write_sample(
        dir.path(),
        "no_jpeg.NEF",
        &create_nef(&RawFixture::new(ByteOrderType::BigEndian).without_jpeg_tags()),
    );
    let missing = dir.path().join("missing.CR2");

    let results = passthrough_service(2)
        .process_all(vec![good, no_jpeg, missing], dest.path(), 75)
        .await;

    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(ExtractError::MissingJpeg { .. })));
    assert!(matches!(results[2], Err(ExtractError::Io(_))));
}

#[tokio::test]
async fn test_process_all_reencodes_with_invalid_quality() {
    let dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let path = write_sample(
        dir.path(),
        "IMG_0100.CR2",
        &create_cr2(&RawFixture::new(ByteOrderType::LittleEndian)),
    );

    let service = ExtractionService::new(
        Arc::new(ParserRegistry::with_defaults()),
        Arc::new(ImageCodec::new()),
        ParseOptions::default().with_ratio_mode(RatioMode::Exact),
        1,
    );
    assert_eq!(service.options().ratio_mode, RatioMode::Exact);

    let results = service.process_all(vec![path], dest.path(), 0).await;
    let parsed = results[0].as_ref().unwrap();
    assert!(parsed.jpeg_path.exists());
}

#[tokio::test]
async fn test_process_all_rejects_duplicate_output_names() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    let first_fixture = RawFixture::new(ByteOrderType::LittleEndian);
    let second_fixture = RawFixture::new(ByteOrderType::BigEndian);
    let first = write_sample(first_dir.path(), "IMG_0001.CR2", &create_cr2(&first_fixture));
    let second = write_sample(second_dir.path(), "IMG_0001.CR2", &create_cr2(&second_fixture));

    let results = passthrough_service(2)
        .process_all(vec![first.clone(), second], dest.path(), 75)
        .await;

    let parsed = results[0].as_ref().unwrap();
    assert_eq!(parsed.source, first);
    assert_eq!(
        std::fs::read(&parsed.jpeg_path).unwrap(),
        first_fixture.jpeg
    );

    match &results[1] {
        Err(ExtractError::OutputCollision { output, first: claimed_by }) => {
            assert_eq!(output, &parsed.jpeg_path.display().to_string());
            assert_eq!(claimed_by, &first.display().to_string());
        }
        other => panic!("expected OutputCollision, got {other:?}"),
    }
}
