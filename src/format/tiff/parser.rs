//! TIFF primitive decoding and header parsing.
//!
//! Raw files from both supported vendors start with the classic TIFF prefix:
//!
//! ```text
//! Bytes 0-1: Byte order (0x4D4D = big-endian "MM", anything else little-endian)
//! Bytes 2-3: TIFF magic (42)
//! Bytes 4-7: Offset to the root IFD (4 bytes, absolute)
//! ```
//!
//! Multi-byte fields are decoded with [`to_ushort`] and [`to_uint`], which
//! take the host byte order explicitly instead of consulting global state.

use crate::error::TiffError;
use crate::io::RangeReader;

// =============================================================================
// Constants
// =============================================================================

/// Byte-order marker for big-endian files ("MM" for Motorola)
pub const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Byte-order marker for little-endian files ("II" for Intel)
pub const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Expected TIFF magic value
pub const TIFF_MAGIC: u16 = 42;

/// Size of the TIFF header prefix in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a file or of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the compile target.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Byte order declared by a header's first two bytes.
    ///
    /// Only `MM` selects big-endian; every other marker is treated as
    /// little-endian.
    pub fn from_marker(marker: [u8; 2]) -> Self {
        if u16::from_be_bytes(marker) == BYTE_ORDER_BIG_ENDIAN {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    #[inline]
    pub fn is_big_endian(self) -> bool {
        self == ByteOrder::BigEndian
    }
}

// =============================================================================
// Primitive conversions
// =============================================================================

/// Convert two file bytes to a u16.
///
/// The bytes are taken verbatim in host order when the host and file agree,
/// and byte-swapped when they differ.
#[inline]
pub fn to_ushort(host: ByteOrder, file: ByteOrder, bytes: [u8; 2]) -> u16 {
    let verbatim = match host {
        ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        ByteOrder::BigEndian => u16::from_be_bytes(bytes),
    };

    if host == file {
        verbatim
    } else {
        verbatim.swap_bytes()
    }
}

/// Convert four file bytes to a u32, built from two [`to_ushort`] halves.
#[inline]
pub fn to_uint(host: ByteOrder, file: ByteOrder, bytes: [u8; 4]) -> u32 {
    let first = to_ushort(host, file, [bytes[0], bytes[1]]) as u32;
    let second = to_ushort(host, file, [bytes[2], bytes[3]]) as u32;

    match file {
        ByteOrder::BigEndian => (first << 16) | second,
        ByteOrder::LittleEndian => (second << 16) | first,
    }
}

/// Map each byte to the character with the same code point.
///
/// No charset validation is done; every byte survives the conversion.
pub fn to_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Extract a SHORT stored left-justified in a 4-byte value field.
///
/// Big-endian files keep the short in the high 16 bits, little-endian files
/// in the low 16 bits.
#[inline]
pub fn short_value(file: ByteOrder, value_or_offset: u32) -> u16 {
    match file {
        ByteOrder::BigEndian => (value_or_offset >> 16) as u16,
        ByteOrder::LittleEndian => (value_or_offset & 0xFFFF) as u16,
    }
}

/// Copy a fixed-size array out of a slice that is known to be long enough.
#[inline]
pub(crate) fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header prefix shared by every supported raw format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// TIFF magic value after byte-order conversion (42 for valid files)
    pub tiff_magic: u16,

    /// Absolute offset of the root IFD
    pub root_ifd_offset: u64,
}

impl TiffHeader {
    /// Parse the 8-byte header prefix.
    ///
    /// The magic value is accepted as-is unless `strict_magic` is set.
    ///
    /// # Errors
    /// - `InvalidMagic` in strict mode when the magic is not 42
    pub fn parse(
        bytes: &[u8; TIFF_HEADER_SIZE],
        host: ByteOrder,
        strict_magic: bool,
    ) -> Result<Self, TiffError> {
        let byte_order = ByteOrder::from_marker(array(&bytes[0..2]));
        let tiff_magic = to_ushort(host, byte_order, array(&bytes[2..4]));

        if strict_magic && tiff_magic != TIFF_MAGIC {
            return Err(TiffError::InvalidMagic(tiff_magic));
        }

        let root_ifd_offset = to_uint(host, byte_order, array(&bytes[4..8])) as u64;

        Ok(TiffHeader {
            byte_order,
            tiff_magic,
            root_ifd_offset,
        })
    }

    /// Read and parse the header prefix at the start of the file.
    ///
    /// # Errors
    /// - `Io(ShortRead)` if the file is shorter than 8 bytes
    /// - `InvalidMagic` in strict mode
    pub fn read<R: RangeReader + ?Sized>(
        reader: &R,
        host: ByteOrder,
        strict_magic: bool,
    ) -> Result<Self, TiffError> {
        let bytes = reader.read_exact_at(0, TIFF_HEADER_SIZE)?;
        Self::parse(&array(&bytes), host, strict_magic)
    }

    #[inline]
    pub fn is_file_big_endian(&self) -> bool {
        self.byte_order.is_big_endian()
    }
}

// =============================================================================
// Tests
// =============================================================================
