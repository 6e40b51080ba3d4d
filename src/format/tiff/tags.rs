//! TIFF field types and the tag vocabulary of each raw format.
//!
//! Tags are grouped by the directory they appear in. Each group is a closed
//! enum; a tag that does not map to a variant is skipped by the interpreter.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// The interpreters dispatch on tag alone, so the field type only shows up in
/// the per-entry debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit ASCII character (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Two LONGs: numerator then denominator (8 bytes)
    Rational = 5,

    /// Undefined byte data (1 byte per element)
    Undefined = 7,
}

impl FieldType {
    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            7 => Some(FieldType::Undefined),
            _ => None,
        }
    }
}

// =============================================================================
// Root IFD tags
// =============================================================================

/// Tags interpreted in a CR2 root IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Cr2RootTag {
    /// Absolute offset of the embedded JPEG (StripOffsets)
    JpegOffset = 0x0111,

    /// Image orientation as a SHORT
    Orientation = 0x0112,

    /// Length of the embedded JPEG in bytes (StripByteCounts)
    JpegLength = 0x0117,

    /// Horizontal resolution, RATIONAL
    XResolution = 0x011A,

    /// Vertical resolution, RATIONAL
    YResolution = 0x011B,

    /// Pointer to the EXIF IFD
    ExifIfd = 0x8769,
}

impl Cr2RootTag {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0111 => Some(Cr2RootTag::JpegOffset),
            0x0112 => Some(Cr2RootTag::Orientation),
            0x0117 => Some(Cr2RootTag::JpegLength),
            0x011A => Some(Cr2RootTag::XResolution),
            0x011B => Some(Cr2RootTag::YResolution),
            0x8769 => Some(Cr2RootTag::ExifIfd),
            _ => None,
        }
    }
}

/// Tags interpreted in a NEF root IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NefRootTag {
    /// Image orientation as a SHORT
    Orientation = 0x0112,

    /// Offset of a LONG holding the SubIFD offset
    SubIfds = 0x014A,

    /// Pointer to the EXIF IFD
    ExifIfd = 0x8769,
}

impl NefRootTag {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0112 => Some(NefRootTag::Orientation),
            0x014A => Some(NefRootTag::SubIfds),
            0x8769 => Some(NefRootTag::ExifIfd),
            _ => None,
        }
    }
}

// =============================================================================
// Nested IFD tags
// =============================================================================

/// Tags interpreted in the NEF preview SubIFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NefSubIfdTag {
    XResolution = 0x011A,
    YResolution = 0x011B,

    /// JPEGInterchangeFormat: offset of the preview JPEG
    JpegOffset = 0x0201,

    /// JPEGInterchangeFormatLength: preview JPEG length in bytes
    JpegLength = 0x0202,
}

impl NefSubIfdTag {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x011A => Some(NefSubIfdTag::XResolution),
            0x011B => Some(NefSubIfdTag::YResolution),
            0x0201 => Some(NefSubIfdTag::JpegOffset),
            0x0202 => Some(NefSubIfdTag::JpegLength),
            _ => None,
        }
    }
}

/// Tags interpreted in an EXIF IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExifTag {
    /// DateTimeDigitized, ASCII "YYYY:MM:DD HH:MM:SS"
    DateTimeDigitized = 0x9004,
}

impl ExifTag {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x9004 => Some(ExifTag::DateTimeDigitized),
            _ => None,
        }
    }
}

// =============================================================================
// Orientation
// =============================================================================

/// Orientation value meaning "rotate 270 degrees clockwise to view".
pub const ORIENTATION_ROTATE_270: u16 = 8;

/// Map an orientation SHORT to a rotation in radians.
///
/// Only value 8 produces a rotation; every other value means upright.
pub fn orientation_radians(orientation: u16) -> f64 {
    if orientation == ORIENTATION_ROTATE_270 {
        270.0 * std::f64::consts::PI / 180.0
    } else {
        0.0
    }
}
