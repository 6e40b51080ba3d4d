//! TIFF decoding shared by the raw formats.
//!
//! CR2 and NEF files are both TIFF containers, so every format parser is
//! built from the same pieces.
//!
//! # Key Concepts
//!
//! - **Byte order**: files declare their endianness in the first two bytes
//!   (`MM` = big-endian, anything else little-endian). Every multi-byte field
//!   is converted with the host order passed explicitly.
//!
//! - **IFD (Image File Directory)**: a counted list of 12-byte entries. Raw
//!   formats nest directories through pointer tags (EXIF IFD, SubIFD).
//!
//! - **Value or offset**: the last four bytes of an entry hold either the
//!   value itself (a SHORT is left-justified) or the absolute offset of it.

mod datetime;
mod ifd;
mod parser;
mod tags;
mod values;

pub use datetime::{month_abbrev, parse_exif_datetime};
pub use ifd::{Ifd, IfdEntry, IFD_COUNT_SIZE, IFD_ENTRY_SIZE};
pub use parser::{
    short_value, to_ascii, to_uint, to_ushort, ByteOrder, TiffHeader, BYTE_ORDER_BIG_ENDIAN,
    BYTE_ORDER_LITTLE_ENDIAN, TIFF_HEADER_SIZE, TIFF_MAGIC,
};
pub(crate) use parser::array;
pub use tags::{
    orientation_radians, Cr2RootTag, ExifTag, FieldType, NefRootTag, NefSubIfdTag,
    ORIENTATION_ROTATE_270,
};
pub use values::{RatioMode, Rational, ValueReader};
