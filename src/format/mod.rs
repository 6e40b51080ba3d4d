//! Format parsers for camera raw files.
//!
//! Both supported formats are TIFF containers; [`tiff`] holds the shared
//! decoding and each format module adds its header extras and tag walk.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify the format of a raw file from
//! its header, or [`detect::RawFormat::from_extension`] from its name.
//! Currently supported formats:
//!
//! - **Canon CR2**: identified by `.cr2` or the `"CR"` marker at offset 8
//! - **Nikon NEF**: identified by `.nef`; any other TIFF header otherwise

pub mod cr2;
pub mod detect;
pub mod interpret;
pub mod nef;
pub mod tiff;

pub use cr2::{Cr2Header, Cr2Parser, CR2_PARSER_KEY};
pub use detect::{detect_format, is_tiff_header, RawFormat};
pub use interpret::{Interpretation, JpegDescriptor, ParseOptions};
pub use nef::{NefParser, NEF_PARSER_KEY};
