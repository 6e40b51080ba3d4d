//! Image File Directory decoding.
//!
//! An IFD is stored as a 2-byte entry count followed by that many 12-byte
//! entries:
//!
//! ```text
//! Bytes 0-1:   tag
//! Bytes 2-3:   field type
//! Bytes 4-7:   count
//! Bytes 8-11:  value, or offset to the value
//! ```
//!
//! The trailing next-IFD pointer is not followed; raw formats reach their
//! nested directories through explicit pointer tags instead.

use tracing::debug;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::parser::{array, to_uint, to_ushort, ByteOrder};
use super::tags::FieldType;

/// Size of one IFD entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count preceding the entries
pub const IFD_COUNT_SIZE: usize = 2;

// =============================================================================
// IfdEntry
// =============================================================================

/// A single entry of an IFD, with every field already in file byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct IfdEntry {
    /// Tag ID
    pub tag: u16,

    /// Raw field type value
    pub field_type: u16,

    /// Number of values
    pub count: u32,

    /// Inline value or absolute offset to the value
    pub value_or_offset: u32,
}

impl IfdEntry {
    /// Decode one entry from exactly 12 bytes.
    pub fn parse(bytes: &[u8; IFD_ENTRY_SIZE], host: ByteOrder, file: ByteOrder) -> Self {
        IfdEntry {
            tag: to_ushort(host, file, array(&bytes[0..2])),
            field_type: to_ushort(host, file, array(&bytes[2..4])),
            count: to_uint(host, file, array(&bytes[4..8])),
            value_or_offset: to_uint(host, file, array(&bytes[8..12])),
        }
    }

    /// The field type, if it is one this crate knows.
    pub fn known_field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.field_type)
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// A decoded directory: its entries in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Ifd {
    /// Absolute offset the directory was read from
    pub offset: u64,

    /// Entries in directory order
    pub entries: Vec<IfdEntry>,
}

impl Ifd {
    /// Read the directory at `offset`.
    ///
    /// The entry block is fetched with a single read sized from the count, so
    /// a count that runs past the end of the file fails before anything is
    /// allocated for it.
    ///
    /// # Errors
    /// - `Io(ShortRead)` if the count or any entry lies past the end of file
    pub fn read<R: RangeReader + ?Sized>(
        reader: &R,
        host: ByteOrder,
        file: ByteOrder,
        offset: u64,
    ) -> Result<Self, TiffError> {
        let count_bytes = reader.read_exact_at(offset, IFD_COUNT_SIZE)?;
        let entry_count = to_ushort(host, file, array(&count_bytes)) as usize;

        let block = reader.read_exact_at(
            offset + IFD_COUNT_SIZE as u64,
            entry_count * IFD_ENTRY_SIZE,
        )?;

        let entries: Vec<IfdEntry> = block
            .chunks_exact(IFD_ENTRY_SIZE)
            .map(|chunk| IfdEntry::parse(&array(chunk), host, file))
            .collect();

        debug!(
            source = reader.identifier(),
            offset,
            entries = entries.len(),
            "Decoded IFD"
        );

        Ok(Ifd { offset, entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
