//! Tag interpretation building blocks shared by the raw formats.
//!
//! Each format walks its own directories, but the outputs, the per-call
//! options, and the EXIF date lookup are common.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::tiff::{parse_exif_datetime, ByteOrder, ExifTag, RatioMode, Rational, ValueReader};

// =============================================================================
// ParseOptions
// =============================================================================

/// Per-call parse configuration.
///
/// Options are immutable and copied into each parse, so one parser can be
/// shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseOptions {
    /// Byte order used when interpreting file bytes before swapping
    pub host_byte_order: ByteOrder,

    /// Reject headers whose TIFF magic is not 42
    pub strict_magic: bool,

    /// How resolution ratios are computed
    pub ratio_mode: RatioMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            host_byte_order: ByteOrder::native(),
            strict_magic: false,
            ratio_mode: RatioMode::Truncating,
        }
    }
}

impl ParseOptions {
    pub fn with_strict_magic(mut self, strict: bool) -> Self {
        self.strict_magic = strict;
        self
    }

    pub fn with_ratio_mode(mut self, mode: RatioMode) -> Self {
        self.ratio_mode = mode;
        self
    }

    pub fn with_host_byte_order(mut self, order: ByteOrder) -> Self {
        self.host_byte_order = order;
        self
    }
}

// =============================================================================
// JpegDescriptor
// =============================================================================

/// Location of the embedded JPEG and the image properties found with it.
///
/// A zero `byte_length` means the directories did not describe a JPEG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JpegDescriptor {
    pub byte_offset: u64,
    pub byte_length: u64,
    pub orientation_radians: f64,
    pub x_resolution: Rational,
    pub y_resolution: Rational,
}

impl JpegDescriptor {
    /// Whether a JPEG byte range was found.
    pub fn has_jpeg(&self) -> bool {
        self.byte_length > 0
    }
}

/// Result of interpreting a file's directories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub descriptor: JpegDescriptor,

    /// DateTimeDigitized from the EXIF IFD, when present and parseable
    pub created: Option<NaiveDateTime>,
}

// =============================================================================
// EXIF
// =============================================================================

/// Read the creation date from the EXIF IFD at `offset`.
///
/// Failing to decode the directory itself is an error. A DateTimeDigitized
/// entry that cannot be read or parsed is skipped, and the first one that
/// parses wins.
pub fn read_exif_created<R: RangeReader + ?Sized>(
    values: &ValueReader<'_, R>,
    offset: u64,
) -> Result<Option<NaiveDateTime>, TiffError> {
    let exif = values.read_ifd(offset)?;

    for entry in &exif.entries {
        match ExifTag::from_u16(entry.tag) {
            Some(ExifTag::DateTimeDigitized) => {
                let raw = match values.read_ascii(entry.value_or_offset as u64, entry.count) {
                    Ok(raw) => raw,
                    Err(e) => {
                        debug!(source = values.identifier(), error = %e, "Unreadable EXIF date");
                        continue;
                    }
                };

                match parse_exif_datetime(&raw) {
                    Ok(created) => return Ok(Some(created)),
                    Err(e) => {
                        debug!(source = values.identifier(), error = %e, "Unparseable EXIF date");
                    }
                }
            }
            None => {}
        }
    }

    Ok(None)
}

/// Read a resolution RATIONAL pointed to by an entry's value field.
pub fn read_resolution<R: RangeReader + ?Sized>(
    values: &ValueReader<'_, R>,
    offset: u32,
    options: &ParseOptions,
) -> Result<Rational, TiffError> {
    values.read_rational(offset as u64, options.ratio_mode)
}
