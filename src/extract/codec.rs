//! JPEG codecs that write extracted previews to disk.
//!
//! # Strategies
//!
//! - [`ImageCodec`]: decodes the embedded JPEG to pixels and re-encodes it at
//!   the requested quality. This normalizes odd vendor streams and lets the
//!   caller trade size for quality.
//!
//! - [`PassthroughCodec`]: writes the embedded bytes verbatim. Quality is
//!   ignored and the output is byte-identical to what the camera stored.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;

use crate::error::{ExtractError, IoError};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// JpegCodec Trait
// =============================================================================

/// Writes an extracted JPEG to `output`.
pub trait JpegCodec: Send + Sync {
    /// Short name for logs and CLI output.
    fn name(&self) -> &'static str;

    /// Encode `jpeg` at `quality` and write it to `output`.
    ///
    /// # Errors
    /// - `Codec` if the source cannot be decoded or re-encoded
    /// - `Io(Write)` if the output file cannot be written
    fn reencode(&self, jpeg: &[u8], quality: u8, output: &Path) -> Result<(), ExtractError>;
}

fn write_output(output: &Path, data: &[u8]) -> Result<(), ExtractError> {
    fs::write(output, data).map_err(|e| {
        ExtractError::Io(IoError::Write {
            path: output.display().to_string(),
            message: e.to_string(),
        })
    })
}

// =============================================================================
// ImageCodec
// =============================================================================

/// Decode-and-re-encode codec backed by the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {}

impl ImageCodec {
    pub fn new() -> Self {
        Self {}
    }

    /// Decode source JPEG and re-encode at the specified quality.
    ///
    /// Quality is clamped to 1-100.
    pub fn encode(&self, source: &[u8], quality: u8) -> Result<Vec<u8>, ExtractError> {
        let quality = clamp_quality(quality);

        let reader = ImageReader::with_format(Cursor::new(source), image::ImageFormat::Jpeg);
        let img = reader.decode().map_err(|e| ExtractError::Codec {
            message: format!("decode failed: {e}"),
        })?;

        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
        encoder
            .encode_image(&img)
            .map_err(|e| ExtractError::Codec {
                message: format!("encode failed: {e}"),
            })?;

        Ok(output)
    }

    /// Get image dimensions without fully decoding.
    pub fn dimensions(&self, source: &[u8]) -> Result<(u32, u32), ExtractError> {
        let reader = ImageReader::with_format(Cursor::new(source), image::ImageFormat::Jpeg);
        reader.into_dimensions().map_err(|e| ExtractError::Codec {
            message: e.to_string(),
        })
    }
}

impl JpegCodec for ImageCodec {
    fn name(&self) -> &'static str {
        "image"
    }

    fn reencode(&self, jpeg: &[u8], quality: u8, output: &Path) -> Result<(), ExtractError> {
        let encoded = self.encode(jpeg, quality)?;
        write_output(output, &encoded)
    }
}

// =============================================================================
// PassthroughCodec
// =============================================================================

/// Codec that writes the embedded JPEG bytes unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCodec;

impl JpegCodec for PassthroughCodec {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn reencode(&self, jpeg: &[u8], _quality: u8, output: &Path) -> Result<(), ExtractError> {
        write_output(output, jpeg)
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
