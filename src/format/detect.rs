//! Format detection for raw files.
//!
//! Files are matched by extension first. When the extension is missing or
//! unknown, the header is examined instead:
//!
//! - **Canon CR2**: TIFF header followed by `"CR"` at offset 8
//! - **Nikon NEF**: any other TIFF header
//!
//! NEF has no container marker of its own, so header detection treats every
//! non-CR2 TIFF as NEF.

use std::path::Path;

use crate::error::ExtractError;
use crate::io::RangeReader;

use super::cr2::{CR2_HEADER_SIZE, CR2_MAGIC, CR2_PARSER_KEY};
use super::nef::NEF_PARSER_KEY;
use super::tiff::{
    array, to_ushort, ByteOrder, BYTE_ORDER_BIG_ENDIAN, BYTE_ORDER_LITTLE_ENDIAN,
    TIFF_HEADER_SIZE, TIFF_MAGIC,
};

// =============================================================================
// RawFormat
// =============================================================================

/// Detected raw format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// Canon Raw Format 2
    Cr2,

    /// Nikon Electronic Format
    Nef,
}

impl RawFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            RawFormat::Cr2 => "Canon CR2",
            RawFormat::Nef => "Nikon NEF",
        }
    }

    /// Registry key of the parser for this format.
    pub const fn key(&self) -> &'static str {
        match self {
            RawFormat::Cr2 => CR2_PARSER_KEY,
            RawFormat::Nef => NEF_PARSER_KEY,
        }
    }

    /// Match a file extension, ignoring case.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("cr2") {
            Some(RawFormat::Cr2)
        } else if ext.eq_ignore_ascii_case("nef") {
            Some(RawFormat::Nef)
        } else {
            None
        }
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// Detect the format of a raw file from its header.
///
/// # Errors
/// - `UnsupportedFormat` if the file does not start with a TIFF header
/// - `Io` if the header cannot be read
pub fn detect_format<R: RangeReader + ?Sized>(reader: &R) -> Result<RawFormat, ExtractError> {
    if reader.size() < TIFF_HEADER_SIZE as u64 {
        return Err(ExtractError::UnsupportedFormat(format!(
            "{}: file too small to be a TIFF",
            reader.identifier()
        )));
    }

    let len = CR2_HEADER_SIZE.min(reader.size() as usize);
    let bytes = reader.read_exact_at(0, len)?;

    if !is_tiff_header(&bytes) {
        return Err(ExtractError::UnsupportedFormat(format!(
            "{}: not a TIFF-based raw file",
            reader.identifier()
        )));
    }

    if bytes.len() >= CR2_HEADER_SIZE && &bytes[8..10] == CR2_MAGIC.as_bytes() {
        Ok(RawFormat::Cr2)
    } else {
        Ok(RawFormat::Nef)
    }
}

/// Check if bytes start with a classic TIFF header (`II*\0` or `MM\0*`).
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < TIFF_HEADER_SIZE {
        return false;
    }

    let marker = u16::from_be_bytes(array(&bytes[0..2]));
    let byte_order = match marker {
        BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
        BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
        _ => return false,
    };

    to_ushort(ByteOrder::native(), byte_order, array(&bytes[2..4])) == TIFF_MAGIC
}

// =============================================================================
// Tests
// =============================================================================
