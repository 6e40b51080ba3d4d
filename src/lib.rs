//! # raw-preview
//!
//! Extract the embedded JPEG and capture metadata from camera raw files.
//!
//! Canon CR2 and Nikon NEF files are TIFF containers that carry a
//! camera-rendered JPEG alongside the sensor data. This library walks the
//! TIFF directories to find that JPEG, its orientation and resolution, and
//! the EXIF capture date, then writes the JPEG out through a codec.
//!
//! ## Features
//!
//! - **Endian-aware decoding**: big- and little-endian files on any host
//! - **Format support**: CR2 (root IFD) and NEF (SubIFD) preview locations
//! - **Bounded reads**: every structure is range-checked against the file
//!   size before it is read
//! - **Batch extraction**: many files processed concurrently on a blocking
//!   worker pool
//!
//! ## Architecture
//!
//! - [`io`] - Positioned reads from files or memory
//! - [`mod@format`] - TIFF decoding and the CR2/NEF tag interpreters
//! - [`raw`] - Parser trait and registry
//! - [`extract`] - JPEG extraction, codecs and the batch service
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use raw_preview::{ImageCodec, ParseOptions, ParserRegistry, RawFileInfo};
//!
//! let registry = ParserRegistry::with_defaults();
//! let parser = registry.get("CR2").expect("CR2 is registered by default");
//!
//! let info = RawFileInfo::new("IMG_0001.CR2", "previews", 75);
//! let parsed = parser
//!     .process_file(&info, &ImageCodec::new(), &ParseOptions::default())
//!     .expect("extraction failed");
//!
//! println!("{} -> {}", parsed.source.display(), parsed.jpeg_path.display());
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod io;
pub mod raw;

// Re-export commonly used types
pub use config::{Cli, CodecKind, Command, ExtractConfig, InspectConfig, OutputFormat, ParseArgs};
pub use error::{DateTimeError, ExtractError, IoError, TiffError};
pub use extract::{
    clamp_quality, derive_output_path, extract_jpeg, is_valid_quality, result_to_json,
    ExtractionResult, ExtractionService, ImageCodec, JpegCodec, PassthroughCodec,
    DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_SUFFIX, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use format::tiff::{
    parse_exif_datetime, ByteOrder, FieldType, Ifd, IfdEntry, RatioMode, Rational, TiffHeader,
    ValueReader, TIFF_HEADER_SIZE,
};
pub use format::{
    detect_format, is_tiff_header, Cr2Header, Cr2Parser, JpegDescriptor, NefParser,
    ParseOptions, RawFormat,
};
pub use io::{FileReader, MemoryReader, RangeReader};
pub use raw::{ContainerInfo, ParsedRawFile, ParserRegistry, RawFileInfo, RawInspection, RawParser};
