//! Nikon NEF parser.
//!
//! NEF files use the plain TIFF header. The preview JPEG is one level deeper
//! than in CR2: the root IFD's SubIFDs tag (0x014A) points at a LONG holding
//! the offset of SubIFD 0, and that directory carries the JPEGInterchangeFormat
//! tags.
//!
//! SubIFD and EXIF IFD decode failures abort the parse.

use tracing::debug;

use crate::error::TiffError;
use crate::io::RangeReader;
use crate::raw::{RawInspection, RawParser};

use super::interpret::{
    read_exif_created, read_resolution, Interpretation, JpegDescriptor, ParseOptions,
};
use super::tiff::{
    orientation_radians, short_value, NefRootTag, NefSubIfdTag, TiffHeader, ValueReader,
};

/// Registry key for the NEF parser.
pub const NEF_PARSER_KEY: &str = "NEF";

/// Parser for Nikon NEF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NefParser;

impl NefParser {
    pub fn new() -> Self {
        Self
    }

    /// Walk the root IFD, SubIFD 0 and the EXIF IFD.
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
            let Some(tag) = NefRootTag::from_u16(entry.tag) else {
                continue;
            };
            debug!(
                tag = ?tag,
                field_type = ?entry.known_field_type(),
                value = entry.value_or_offset,
                "NEF root entry"
            );

            match tag {
                NefRootTag::SubIfds => {
                    let sub_offset = values.read_u32_at(entry.value_or_offset as u64)?;
                    Self::interpret_sub_ifd(&values, sub_offset as u64, options, &mut descriptor)?;
                }
                NefRootTag::Orientation => {
                    let orientation = short_value(header.byte_order, entry.value_or_offset);
                    descriptor.orientation_radians = orientation_radians(orientation);
                }
                NefRootTag::ExifIfd => {
                    let date = read_exif_created(&values, entry.value_or_offset as u64)?;
                    created = created.or(date);
                }
            }
        }

        Ok(Interpretation {
            descriptor,
            created,
        })
    }

    fn interpret_sub_ifd<R: RangeReader + ?Sized>(
        values: &ValueReader<'_, R>,
        offset: u64,
        options: &ParseOptions,
        descriptor: &mut JpegDescriptor,
    ) -> Result<(), TiffError> {
        let sub_ifd = values.read_ifd(offset)?;

        for entry in &sub_ifd.entries {
            let Some(tag) = NefSubIfdTag::from_u16(entry.tag) else {
                continue;
            };
            debug!(
                tag = ?tag,
                field_type = ?entry.known_field_type(),
                value = entry.value_or_offset,
                "NEF SubIFD entry"
            );

            match tag {
                NefSubIfdTag::XResolution => {
                    descriptor.x_resolution =
                        read_resolution(values, entry.value_or_offset, options)?;
                }
                NefSubIfdTag::YResolution => {
                    descriptor.y_resolution =
                        read_resolution(values, entry.value_or_offset, options)?;
                }
                NefSubIfdTag::JpegOffset => descriptor.byte_offset = entry.value_or_offset as u64,
                NefSubIfdTag::JpegLength => descriptor.byte_length = entry.value_or_offset as u64,
            }
        }

        Ok(())
    }
}

impl RawParser for NefParser {
    fn key(&self) -> &'static str {
        NEF_PARSER_KEY
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["nef"]
    }

    fn inspect(
        &self,
        reader: &dyn RangeReader,
        options: &ParseOptions,
    ) -> Result<RawInspection, TiffError> {
        let header = TiffHeader::read(reader, options.host_byte_order, options.strict_magic)?;
        let Interpretation {
            descriptor,
            created,
        } = Self::interpret(reader, &header, options)?;

        Ok(RawInspection {
            format: NEF_PARSER_KEY,
            source: reader.identifier().to_string(),
            header,
            container: None,
            descriptor,
            created,
        })
    }
}
