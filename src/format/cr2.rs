//! Canon CR2 parser.
//!
//! A CR2 file is a TIFF file whose header carries four extra bytes:
//!
//! ```text
//! Bytes 8-9:  Container magic, ASCII "CR" (not byte-order converted)
//! Byte 10:    Major version
//! Byte 11:    Minor version
//! ```
//!
//! The root IFD (IFD0) describes a full-size JPEG through the strip tags and
//! points at the EXIF IFD.

use tracing::{debug, warn};

use crate::error::TiffError;
use crate::io::RangeReader;
use crate::raw::{ContainerInfo, RawInspection, RawParser};

use super::interpret::{
    read_exif_created, read_resolution, Interpretation, JpegDescriptor, ParseOptions,
};
use super::tiff::{
    array, orientation_radians, short_value, to_ascii, Cr2RootTag, TiffHeader, ValueReader,
    TIFF_HEADER_SIZE,
};

/// Registry key for the CR2 parser.
pub const CR2_PARSER_KEY: &str = "CR2";

/// Container magic found at offset 8 of every CR2 file.
pub const CR2_MAGIC: &str = "CR";

/// Size of the CR2 header including the TIFF prefix.
pub const CR2_HEADER_SIZE: usize = 12;

// =============================================================================
// Cr2Header
// =============================================================================

/// Parsed CR2 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cr2Header {
    pub tiff: TiffHeader,

    /// Two ASCII characters at offset 8, `"CR"` in real files
    pub container_magic: String,

    pub major_version: u8,
    pub minor_version: u8,
}

impl Cr2Header {
    /// Read the CR2 header at the start of the file.
    ///
    /// The container magic is reported, not validated.
    ///
    /// # Errors
    /// - `Io(ShortRead)` if the file is shorter than 12 bytes
    /// - `InvalidMagic` in strict mode
    pub fn read<R: RangeReader + ?Sized>(
        reader: &R,
        options: &ParseOptions,
    ) -> Result<Self, TiffError> {
        let tiff = TiffHeader::read(reader, options.host_byte_order, options.strict_magic)?;

        let extra = reader.read_exact_at(
            TIFF_HEADER_SIZE as u64,
            CR2_HEADER_SIZE - TIFF_HEADER_SIZE,
        )?;
        let magic: [u8; 2] = array(&extra[0..2]);

        Ok(Cr2Header {
            tiff,
            container_magic: to_ascii(&magic),
            major_version: extra[2],
            minor_version: extra[3],
        })
    }

    /// Whether the container magic is `"CR"`.
    pub fn has_cr2_magic(&self) -> bool {
        self.container_magic == CR2_MAGIC
    }

    pub fn container_info(&self) -> ContainerInfo {
        ContainerInfo {
            magic: self.container_magic.clone(),
            major_version: self.major_version,
            minor_version: self.minor_version,
        }
    }
}

// =============================================================================
// Cr2Parser
// =============================================================================

/// Parser for Canon CR2 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cr2Parser;

impl Cr2Parser {
    pub fn new() -> Self {
        Self
    }

    /// Walk the root IFD and the EXIF IFD it points to.
    ///
    /// A failure to decode the EXIF IFD is logged and leaves the creation
    /// date empty; a failure reading the root IFD or a resolution rational
    /// aborts the call.
    pub fn interpret<R: RangeReader + ?Sized>(
        reader: &R,
        header: &TiffHeader,
        options: &ParseOptions,
    ) -> Result<Interpretation, TiffError> {
        let values = ValueReader::new(reader, options.host_byte_order, header.byte_order);
        let root = values.read_ifd(header.root_ifd_offset)?;

        let mut descriptor = JpegDescriptor::default();
        let mut created = None;

        for entry in &root.entries {
            let Some(tag) = Cr2RootTag::from_u16(entry.tag) else {
                continue;
            };
            debug!(
                tag = ?tag,
                field_type = ?entry.known_field_type(),
                value = entry.value_or_offset,
                "CR2 root entry"
            );

            match tag {
                Cr2RootTag::JpegOffset => descriptor.byte_offset = entry.value_or_offset as u64,
                Cr2RootTag::JpegLength => descriptor.byte_length = entry.value_or_offset as u64,
                Cr2RootTag::Orientation => {
                    let orientation = short_value(header.byte_order, entry.value_or_offset);
                    descriptor.orientation_radians = orientation_radians(orientation);
                }
                Cr2RootTag::XResolution => {
                    descriptor.x_resolution =
                        read_resolution(&values, entry.value_or_offset, options)?;
                }
                Cr2RootTag::YResolution => {
                    descriptor.y_resolution =
                        read_resolution(&values, entry.value_or_offset, options)?;
                }
                Cr2RootTag::ExifIfd => {
                    match read_exif_created(&values, entry.value_or_offset as u64) {
                        Ok(date) => created = created.or(date),
                        Err(e) => warn!(
                            source = reader.identifier(),
                            error = %e,
                            "Skipping unreadable EXIF IFD"
                        ),
                    }
                }
            }
        }

        Ok(Interpretation {
            descriptor,
            created,
        })
    }
}

impl RawParser for Cr2Parser {
    fn key(&self) -> &'static str {
        CR2_PARSER_KEY
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cr2"]
    }

    fn inspect(
        &self,
        reader: &dyn RangeReader,
        options: &ParseOptions,
    ) -> Result<RawInspection, TiffError> {
        let header = Cr2Header::read(reader, options)?;
        if !header.has_cr2_magic() {
            debug!(
                source = reader.identifier(),
                magic = ?header.container_magic,
                "CR2 container magic mismatch"
            );
        }

        let Interpretation {
            descriptor,
            created,
        } = Self::interpret(reader, &header.tiff, options)?;

        Ok(RawInspection {
            format: CR2_PARSER_KEY,
            source: reader.identifier().to_string(),
            header: header.tiff,
            container: Some(header.container_info()),
            descriptor,
            created,
        })
    }
}
