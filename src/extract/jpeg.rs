//! Embedded JPEG extraction and output naming.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExtractError, IoError};
use crate::format::JpegDescriptor;
use crate::io::RangeReader;

use super::codec::JpegCodec;

/// Suffix appended to the source file name to name the extracted JPEG.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_extracted.jpg";

/// Path of the extracted JPEG for `source`: `dest_dir/<file name><suffix>`.
///
/// The source's extension is kept, so `IMG_0001.CR2` becomes
/// `IMG_0001.CR2_extracted.jpg`.
pub fn derive_output_path(source: &Path, dest_dir: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(source.file_name().unwrap_or_default());
    name.push(suffix);
    dest_dir.join(name)
}

/// Copy the JPEG described by `descriptor` out of the file and hand it to
/// `codec` for writing to `output`.
///
/// # Errors
/// - `MissingJpeg` if the descriptor has no byte length; the codec is not
///   called
/// - `Io(ShortRead)` if the byte range runs past the end of the file
/// - whatever the codec returns
pub fn extract_jpeg<R: RangeReader + ?Sized>(
    reader: &R,
    descriptor: &JpegDescriptor,
    codec: &dyn JpegCodec,
    quality: u8,
    output: &Path,
) -> Result<(), ExtractError> {
    if !descriptor.has_jpeg() {
        return Err(ExtractError::MissingJpeg {
            length: descriptor.byte_length,
        });
    }

    let len = usize::try_from(descriptor.byte_length).map_err(|_| IoError::ShortRead {
        offset: descriptor.byte_offset,
        requested: descriptor.byte_length,
        size: reader.size(),
    })?;
    let jpeg = reader.read_exact_at(descriptor.byte_offset, len)?;

    debug!(
        source = reader.identifier(),
        offset = descriptor.byte_offset,
        length = len,
        codec = codec.name(),
        output = %output.display(),
        "Writing embedded JPEG"
    );

    codec.reencode(&jpeg, quality, output)
}
