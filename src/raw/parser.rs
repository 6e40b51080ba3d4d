//! RawParser trait for format-agnostic raw file processing.
//!
//! The trait is implemented by the format interpreters:
//! - [`crate::format::Cr2Parser`] for Canon CR2 files
//! - [`crate::format::NefParser`] for Nikon NEF files
//!
//! A parser only has to describe a file ([`RawParser::inspect`]); opening the
//! file, extracting the JPEG and naming the output are shared.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::error::{ExtractError, TiffError};
use crate::extract::{derive_output_path, extract_jpeg, JpegCodec, DEFAULT_OUTPUT_SUFFIX};
use crate::format::tiff::TiffHeader;
use crate::format::{JpegDescriptor, ParseOptions};
use crate::io::{FileReader, RangeReader};

// =============================================================================
// Request and results
// =============================================================================

/// A request to process one raw file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileInfo {
    /// Raw file to read
    pub file: PathBuf,

    /// Directory the extracted JPEG is written to
    pub dest_dir: PathBuf,

    /// JPEG quality handed to the codec (1-100)
    pub quality: u8,
}

impl RawFileInfo {
    pub fn new(file: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            file: file.into(),
            dest_dir: dest_dir.into(),
            quality,
        }
    }
}

/// Outcome of processing one raw file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRawFile {
    /// The raw file that was read
    pub source: PathBuf,

    /// Capture timestamp from EXIF, at minute precision
    pub created: Option<NaiveDateTime>,

    /// Where the JPEG was written
    pub jpeg_path: PathBuf,

    /// Rotation needed to display the image upright
    pub orientation_radians: f64,
}

/// Container fields that only some formats carry after the TIFF header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    /// Two ASCII characters identifying the container (`"CR"` for CR2)
    pub magic: String,
    pub major_version: u8,
    pub minor_version: u8,
}

/// Everything a parser learns about a file without extracting from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawInspection {
    /// Registry key of the parser that produced this
    pub format: &'static str,

    /// Identifier of the reader the file was read through
    pub source: String,

    pub header: TiffHeader,
    pub container: Option<ContainerInfo>,
    pub descriptor: JpegDescriptor,
    pub created: Option<NaiveDateTime>,
}

// =============================================================================
// RawParser Trait
// =============================================================================

/// Format-specific interpreter for a TIFF-based raw file.
///
/// Parsers hold no per-file state. Everything a parse needs arrives through
/// the reader and [`ParseOptions`], so a single parser can serve many files
/// concurrently.
pub trait RawParser: Send + Sync {
    /// Registry key, e.g. `"CR2"`.
    fn key(&self) -> &'static str;

    /// Lower-case file extensions this parser handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Decode the header and walk the directories.
    ///
    /// # Errors
    /// - `Io(ShortRead)` if a structure the format requires lies past the end
    ///   of the file
    /// - `InvalidMagic` in strict mode
    fn inspect(
        &self,
        reader: &dyn RangeReader,
        options: &ParseOptions,
    ) -> Result<RawInspection, TiffError>;

    /// Extract the embedded JPEG of `info.file` into `info.dest_dir`.
    ///
    /// The output is named after the source file with `_extracted.jpg`
    /// appended.
    ///
    /// # Errors
    /// - `Io(Open)` if the file cannot be opened; no directory is read
    /// - `Tiff` for header or directory failures
    /// - `MissingJpeg` if no JPEG byte range was found; the codec is not
    ///   invoked
    /// - `Codec` or `Io(Write)` from the codec
    fn process_file(
        &self,
        info: &RawFileInfo,
        codec: &dyn JpegCodec,
        options: &ParseOptions,
    ) -> Result<ParsedRawFile, ExtractError> {
        let reader = FileReader::open(&info.file)?;
        let inspection = self.inspect(&reader, options)?;

        let jpeg_path = derive_output_path(&info.file, &info.dest_dir, DEFAULT_OUTPUT_SUFFIX);
        extract_jpeg(
            &reader,
            &inspection.descriptor,
            codec,
            info.quality,
            &jpeg_path,
        )?;

        info!(
            format = self.key(),
            source = %info.file.display(),
            output = %jpeg_path.display(),
            "Extracted embedded JPEG"
        );

        Ok(ParsedRawFile {
            source: info.file.clone(),
            created: inspection.created,
            jpeg_path,
            orientation_radians: inspection.descriptor.orientation_radians,
        })
    }
}
